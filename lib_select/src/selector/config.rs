use crate::geo::{GeoError, GeoPoint, DEFAULT_LOCATION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving or validating configuration.
///
/// These are always reported before the selector runs; malformed explicit
/// input is never repaired or replaced by a default.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is present but outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The reference location could not be parsed or validated.
    #[error("invalid location: {0}")]
    Location(#[from] GeoError),

    /// A named configuration file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid JSON5 for the expected shape.
    #[error("cannot parse config file {path}: {message}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Only one of the server list / server stats files was given.
    #[error("server list and server stats files must be given together")]
    IncompleteServerFiles,
}

/// Candidate ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "configs", derive(clap::ValueEnum))]
pub enum RankOrder {
    /// Closest first; near-equal distances broken by lower load.
    #[default]
    Distance,
    /// Least loaded first; equal loads broken by distance.
    Load,
}

/// Fully resolved selection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    /// Reference point distances are measured from.
    pub location: GeoPoint,
    /// Inclusive upper bound on load, percent.
    pub max_load: Option<u8>,
    /// Inclusive upper bound on distance, miles.
    pub max_distance: Option<f64>,
    /// Country tag filter, compared case-insensitively.
    pub country: Option<String>,
    /// Categories every candidate must carry.
    pub required_categories: Vec<String>,
    /// Features every candidate must have enabled.
    pub required_features: Vec<String>,
    /// Maximum number of results.
    pub result_count: usize,
    /// Ranking policy.
    pub rank_order: RankOrder,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

impl SelectionConfig {
    /// An unconstrained configuration returning the single closest server.
    pub fn new(location: GeoPoint) -> Self {
        Self {
            location,
            max_load: None,
            max_distance: None,
            country: None,
            required_categories: Vec::new(),
            required_features: Vec::new(),
            result_count: 1,
            rank_order: RankOrder::Distance,
        }
    }

    /// Checks the invariants the selector relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        GeoPoint::new(self.location.latitude, self.location.longitude)?;
        if let Some(load) = self.max_load {
            if load > 100 {
                return Err(ConfigError::Invalid(format!(
                    "max_load must be within 0..=100, got {}",
                    load
                )));
            }
        }
        if let Some(distance) = self.max_distance {
            if !distance.is_finite() || distance <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_distance must be a positive number of miles, got {}",
                    distance
                )));
            }
        }
        if self.result_count == 0 {
            return Err(ConfigError::Invalid("count must be at least 1".to_string()));
        }
        if matches!(&self.country, Some(c) if c.trim().is_empty()) {
            return Err(ConfigError::Invalid("country must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = SelectionConfig::default();
        assert_eq!(cfg.location, DEFAULT_LOCATION);
        assert_eq!(cfg.result_count, 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = SelectionConfig::default();
        cfg.max_load = Some(101);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = SelectionConfig::default();
        cfg.max_distance = Some(-5.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = SelectionConfig::default();
        cfg.result_count = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = SelectionConfig::default();
        cfg.country = Some("  ".into());
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = SelectionConfig::default();
        cfg.location = GeoPoint { latitude: 95.0, longitude: 0.0 };
        assert!(matches!(cfg.validate(), Err(ConfigError::Location(_))));
    }

    #[test]
    fn test_validate_accepts_bounds() {
        let mut cfg = SelectionConfig::default();
        cfg.max_load = Some(0);
        assert!(cfg.validate().is_ok());
        cfg.max_load = Some(100);
        assert!(cfg.validate().is_ok());
    }
}
