use anyhow::{Context, Result};
use colored::Colorize;
use log::{Level, LevelFilter};
use std::fs;
use std::path::{Path, PathBuf};

/// Installs the global logger.
///
/// Records go to stderr (stdout carries the program's output) with a colored
/// level tag, and, when `log_dir` is set, to `<app_name>_<timestamp>.log`
/// in that directory. Older log files of the same app are pruned so that at
/// most one previous file is kept next to the new one.
///
/// Fails if a logger was already installed in this process.
pub fn setup_logging(app_name: &str, level: LevelFilter, log_dir: Option<&Path>) -> Result<()> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                colored_level(record.level()),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().level(level).chain(console);

    if let Some(dir) = log_dir {
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("cannot create log directory {}", dir.display()))?;
        }
        cleanup_old_logs(dir, app_name)?;

        let path = dir.join(log_file_name(app_name));
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}[{}][{}] {}",
                    chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .chain(fern::log_file(&path).with_context(|| format!("cannot open {}", path.display()))?);
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().context("logger already initialized")?;
    Ok(())
}

fn colored_level(level: Level) -> colored::ColoredString {
    let tag = level.to_string();
    match level {
        Level::Error => tag.bright_red(),
        Level::Warn => tag.bright_yellow(),
        Level::Info => tag.bright_green(),
        Level::Debug => tag.bright_white(),
        Level::Trace => tag.bright_cyan(),
    }
}

fn log_file_name(app_name: &str) -> String {
    format!("{}_{}.log", app_name, chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

/// Deletes all but the newest `<app_name>_*.log` file in `log_dir`.
fn cleanup_old_logs(log_dir: &Path, app_name: &str) -> Result<()> {
    let prefix = format!("{}_", app_name);
    let mut entries: Vec<PathBuf> = fs::read_dir(log_dir)?
        .filter_map(|res| res.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&prefix))
        })
        .collect();

    // Timestamped names sort chronologically; newest first.
    entries.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

    for path in entries.iter().skip(1) {
        if let Err(e) = fs::remove_file(path) {
            eprintln!("Failed to delete old log file {:?}: {}", path, e);
        }
    }

    Ok(())
}
