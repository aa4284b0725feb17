//! # lib_select
//!
//! Picks a recommended VPN endpoint from a provider's published server list,
//! ranking candidates by great-circle distance from a reference location and
//! by reported load.
//!
//! The selection core (`geo`, `selector`) is always compiled and does no
//! I/O. The collaborators around it are feature-gated by folder:
//!
//! - `configs`: option layering (defaults, JSON5 file, CLI/env).
//! - `loggers`: `fern` logger setup for binaries.
//! - `retrieve`: retrying HTTP JSON client.
//! - `sources`: provider API and local-file server sources.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Coordinates and great-circle distance.
pub mod geo;
/// Filtering and ranking of candidate servers.
pub mod selector;

/// Configuration resolution.
#[cfg(feature = "configs")]
pub mod configs;
/// Logging setup.
#[cfg(feature = "loggers")]
pub mod loggers;
/// HTTP retrieval.
#[cfg(feature = "retrieve")]
pub mod retrieve;
/// Server list sources.
#[cfg(feature = "sources")]
pub mod sources;

pub use geo::{GeoPoint, DEFAULT_LOCATION};
pub use selector::{select, ConfigError, RankOrder, RankedResult, RankedServer, SelectionConfig, ServerRecord};
