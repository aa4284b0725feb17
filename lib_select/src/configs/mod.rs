//! # Configuration Modules
//!
//! Resolves the options of a selection run from three layers, lowest
//! precedence first: built-in defaults, a JSON5 configuration file, and the
//! command line (which includes `SERVER_SELECT_*` environment variables).

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Option layers, merge and validation.
pub mod config_select;

pub use config_select::{
    default_config_path, resolve, LoggingConfig, OutputTarget, ResolvedConfig, SelectDefaults,
    SelectOptions, SourceChoice, CONFIG_FILE_NAME,
};
