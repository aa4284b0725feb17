use crate::geo::{GeoPoint, DEFAULT_LOCATION};
use crate::selector::{ConfigError, RankOrder, SelectionConfig};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// File name looked up in the user's configuration directory.
pub const CONFIG_FILE_NAME: &str = "server-select.json5";

/// One layer of options. Every field is optional so layers can be merged.
///
/// The same struct is parsed from the command line and deserialized from
/// the configuration file (camelCase keys).
#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[command(name = "server-select", about = "Select a NordVPN server endpoint", long_about = None, version)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SelectOptions {
    /// GPS location used to determine server distance.
    #[arg(short = 'g', long, env = "SERVER_SELECT_LOCATION", value_name = "LAT,LON", allow_hyphen_values = true)]
    pub location: Option<String>,

    /// Country flag for the VPN endpoint (e.g. US).
    #[arg(short = 'c', long, env = "SERVER_SELECT_COUNTRY")]
    pub country: Option<String>,

    /// Max distance for a VPN endpoint (miles).
    #[arg(short = 'm', long, env = "SERVER_SELECT_MAX_DISTANCE", value_name = "MILES")]
    pub max_distance: Option<f64>,

    /// Max load for a VPN endpoint.
    #[arg(short = 'l', long, env = "SERVER_SELECT_MAX_LOAD", value_name = "PERCENT")]
    pub max_load: Option<u8>,

    /// Number of servers to include.
    #[arg(short = 'n', long, env = "SERVER_SELECT_COUNT")]
    pub count: Option<usize>,

    /// Required server category; repeat or comma-separate.
    #[arg(long = "category", env = "SERVER_SELECT_CATEGORIES", value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Required server feature; repeat or comma-separate.
    #[arg(long = "feature", env = "SERVER_SELECT_FEATURES", value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// Rank by distance (default) or by load.
    #[arg(long, env = "SERVER_SELECT_RANK_BY", value_enum)]
    pub rank_by: Option<RankOrder>,

    /// File to write the selection to. Printed to stdout if not specified.
    #[arg(short = 'o', long, env = "SERVER_SELECT_OUTPUT_FILE", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// File containing the server list. Downloaded if not specified.
    #[arg(long, env = "SERVER_SELECT_SERVER_LIST", value_name = "FILE")]
    pub server_list: Option<PathBuf>,

    /// File containing the server stats. Downloaded if not specified.
    #[arg(long, env = "SERVER_SELECT_SERVER_STATS", value_name = "FILE")]
    pub server_stats: Option<PathBuf>,

    /// Base URL of the provider API.
    #[arg(long, env = "SERVER_SELECT_API_URL")]
    pub api_url: Option<String>,

    /// Logging level (off, error, warn, info, debug, trace).
    #[arg(long, env = "SERVER_SELECT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for log files. No log file if not specified.
    #[arg(long, env = "SERVER_SELECT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to the JSON5 configuration file.
    #[arg(long, env = "SERVER_SELECT_CONFIG", value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl SelectOptions {
    // 'other' overrides 'self' for Some values
    fn merge(self, other: SelectOptions) -> SelectOptions {
        SelectOptions {
            location: other.location.or(self.location),
            country: other.country.or(self.country),
            max_distance: other.max_distance.or(self.max_distance),
            max_load: other.max_load.or(self.max_load),
            count: other.count.or(self.count),
            categories: other.categories.or(self.categories),
            features: other.features.or(self.features),
            rank_by: other.rank_by.or(self.rank_by),
            output_file: other.output_file.or(self.output_file),
            server_list: other.server_list.or(self.server_list),
            server_stats: other.server_stats.or(self.server_stats),
            api_url: other.api_url.or(self.api_url),
            log_level: other.log_level.or(self.log_level),
            log_dir: other.log_dir.or(self.log_dir),
            config: other.config.or(self.config),
        }
    }
}

/// Built-in defaults, the lowest configuration layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDefaults {
    /// Reference location when none is configured.
    pub location: GeoPoint,
    /// Number of servers returned.
    pub count: usize,
    /// Categories required of every candidate.
    pub categories: Vec<String>,
    /// Features required of every candidate.
    pub features: Vec<String>,
    /// Provider API root.
    pub api_url: String,
    /// Logging level.
    pub log_level: String,
}

impl SelectDefaults {
    /// Standard + P2P servers with OpenVPN over UDP, measured from the
    /// center of the contiguous US, one result.
    pub fn legacy() -> Self {
        Self {
            location: DEFAULT_LOCATION,
            count: 1,
            categories: vec!["Standard VPN servers".to_string(), "P2P".to_string()],
            features: vec!["openvpn_udp".to_string()],
            api_url: default_api_url(),
            log_level: "info".to_string(),
        }
    }

    fn into_options(self) -> SelectOptions {
        SelectOptions {
            location: Some(self.location.to_string()),
            count: Some(self.count),
            categories: Some(self.categories),
            features: Some(self.features),
            api_url: Some(self.api_url),
            log_level: Some(self.log_level),
            ..Default::default()
        }
    }
}

#[cfg(feature = "sources")]
fn default_api_url() -> String {
    crate::sources::NORDVPN_API_URL.to_string()
}

#[cfg(not(feature = "sources"))]
fn default_api_url() -> String {
    "https://nordvpn.com/".to_string()
}

/// Where the candidate list comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceChoice {
    /// Download from the provider API.
    Remote {
        /// API root.
        api_url: String,
    },
    /// Read local copies of both documents.
    Files {
        /// Server list document.
        server_list: PathBuf,
        /// Server stats document.
        server_stats: PathBuf,
    },
}

/// Where the ranked result is written.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    /// Standard output.
    Stdout,
    /// A file, overwritten.
    File(PathBuf),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Maximum level emitted.
    pub level: log::LevelFilter,
    /// Directory for a log file, if any.
    pub dir: Option<PathBuf>,
}

/// Fully merged and validated configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Selector parameters.
    pub selection: SelectionConfig,
    /// Candidate source.
    pub source: SourceChoice,
    /// Result destination.
    pub output: OutputTarget,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// `<user config dir>/server-select.json5`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Merges `defaults`, the configuration file and `cli` (highest precedence)
/// and validates the result.
///
/// The file is `cli.config` when given (it must then exist), otherwise
/// [`default_config_path`] (skipped quietly when absent).
pub fn resolve(cli: SelectOptions, defaults: SelectDefaults) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(cli, defaults, default_config_path())
}

fn resolve_with(
    cli: SelectOptions,
    defaults: SelectDefaults,
    fallback_file: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let mut merged = defaults.into_options();

    if let Some(file_config) = load_file(cli.config.clone(), fallback_file)? {
        merged = merged.merge(file_config);
    }

    merged = merged.merge(cli);
    build(merged)
}

fn load_file(
    explicit: Option<PathBuf>,
    fallback: Option<PathBuf>,
) -> Result<Option<SelectOptions>, ConfigError> {
    let (path, required) = match (explicit, fallback) {
        (Some(path), _) => (path, true),
        (None, Some(path)) => (path, false),
        (None, None) => return Ok(None),
    };

    if !required && !path.exists() {
        log::debug!("Config file not found at {}. Using defaults and CLI/env.", path.display());
        return Ok(None);
    }

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let options: SelectOptions = serde_json5::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    log::debug!("Loaded config file {}", path.display());
    Ok(Some(options))
}

fn build(options: SelectOptions) -> Result<ResolvedConfig, ConfigError> {
    let location = match options.location.as_deref() {
        Some(text) => GeoPoint::from_str(text)?,
        None => DEFAULT_LOCATION,
    };

    let clean = |list: Option<Vec<String>>| -> Vec<String> {
        list.unwrap_or_default()
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let selection = SelectionConfig {
        location,
        max_load: options.max_load,
        max_distance: options.max_distance,
        country: options.country.map(|c| c.trim().to_string()),
        required_categories: clean(options.categories),
        required_features: clean(options.features),
        result_count: options.count.unwrap_or(1),
        rank_order: options.rank_by.unwrap_or_default(),
    };
    selection.validate()?;

    let source = match (options.server_list, options.server_stats) {
        (Some(server_list), Some(server_stats)) => SourceChoice::Files {
            server_list,
            server_stats,
        },
        (None, None) => SourceChoice::Remote {
            api_url: options.api_url.unwrap_or_else(default_api_url),
        },
        _ => return Err(ConfigError::IncompleteServerFiles),
    };

    let level_text = options.log_level.unwrap_or_else(|| "info".to_string());
    let level = log::LevelFilter::from_str(&level_text)
        .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", level_text)))?;

    Ok(ResolvedConfig {
        selection,
        source,
        output: options
            .output_file
            .map_or(OutputTarget::Stdout, OutputTarget::File),
        logging: LoggingConfig {
            level,
            dir: options.log_dir,
        },
    })
}
