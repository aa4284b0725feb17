//! # server-select
//!
//! Selects a NordVPN server endpoint close to a location and under a load
//! limit, and prints the ranking as JSON.
//!
//! Exit status: `0` when at least one server was selected, `1` when nothing
//! met the criteria, `2` for configuration errors, `3` for runtime failures
//! (download, file I/O).

use anyhow::{Context, Result};
use clap::Parser;
use lib_select::configs::{resolve, OutputTarget, ResolvedConfig, SelectDefaults, SelectOptions, SourceChoice};
use lib_select::loggers::setup_logging;
use lib_select::sources::{load_candidates, FileSource, NordVpnSource};
use lib_select::{select, RankedResult, ServerRecord};
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

const APP_NAME: &str = "server-select";

#[tokio::main]
async fn main() -> ExitCode {
    let resolved = match resolve(SelectOptions::parse(), SelectDefaults::legacy()) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = setup_logging(APP_NAME, resolved.logging.level, resolved.logging.dir.as_deref()) {
        eprintln!("{}: {:#}", APP_NAME, e);
        return ExitCode::from(3);
    }

    match run(&resolved).await {
        Ok(result) if result.is_empty() => {
            log::warn!("No server meets the selection criteria");
            ExitCode::from(1)
        }
        Ok(result) => {
            let picked: Vec<&str> = result.iter().map(|r| r.server.id.as_str()).collect();
            log::info!("Selected {}", picked.join(", "));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::from(3)
        }
    }
}

async fn run(config: &ResolvedConfig) -> Result<RankedResult> {
    let candidates: Vec<ServerRecord> = match &config.source {
        SourceChoice::Remote { api_url } => {
            let source = NordVpnSource::new(api_url)?;
            load_candidates(&source).await?
        }
        SourceChoice::Files { server_list, server_stats } => {
            let source = FileSource::new(server_list, server_stats);
            load_candidates(&source).await?
        }
    };

    log::debug!("Selecting with {:?}", config.selection);
    let result = select(&candidates, &config.selection);

    let rendered = render(&result)?;
    write_output(&config.output, &rendered)?;
    Ok(result)
}

/// Pretty JSON with keys sorted, `[]` when empty.
fn render(result: &RankedResult) -> Result<String> {
    // Round-tripping through Value sorts object keys.
    let value = serde_json::to_value(result).context("cannot serialize selection")?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn write_output(target: &OutputTarget, rendered: &str) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered)?;
            stdout.flush()?;
        }
        OutputTarget::File(path) => {
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("cannot write {}", path.display()))?;
            log::info!("Wrote selection to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_select::RankedServer;
    use tempfile::tempdir;

    fn ranked(id: &str, distance: f64) -> RankedServer {
        RankedServer {
            server: ServerRecord {
                id: id.to_string(),
                name: "United States #1".to_string(),
                country: "US".to_string(),
                latitude: Some(40.0),
                longitude: Some(-75.0),
                load: Some(10),
                ..Default::default()
            },
            distance,
        }
    }

    #[test]
    fn test_render_empty_is_empty_array() {
        assert_eq!(render(&Vec::new()).unwrap(), "[]");
    }

    #[test]
    fn test_render_sorts_keys() {
        let text = render(&vec![ranked("us1.nordvpn.com", 1.5)]).unwrap();
        let country = text.find("\"country\"").unwrap();
        let distance = text.find("\"distance\"").unwrap();
        let load = text.find("\"load\"").unwrap();
        assert!(country < distance && distance < load);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["id"], "us1.nordvpn.com");
        assert_eq!(parsed[0]["distance"], 1.5);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("selection.json");
        write_output(&OutputTarget::File(path.clone()), "[]").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]\n");
    }
}
