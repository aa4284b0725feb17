//! # Server Selector
//!
//! The pure core of the crate: given an in-memory list of [`ServerRecord`]s
//! and a resolved [`SelectionConfig`], filter, score and rank the candidates.
//!
//! ## Contained Modules:
//!
//! - **`model`**: candidate and result types.
//! - **`config`**: selection parameters, their validation and `ConfigError`.
//! - **`rank`**: the `select` pass itself (filter, distance, rank, truncate).
//!
//! Nothing in here performs I/O. Where the candidates came from and how the
//! configuration was merged are the concern of `sources` and `configs`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Selection parameters and configuration errors.
pub mod config;
/// Candidate records and ranked output.
pub mod model;
/// Filtering and ranking.
pub mod rank;

pub use config::{ConfigError, RankOrder, SelectionConfig};
pub use model::{RankedResult, RankedServer, ServerRecord};
pub use rank::{select, DISTANCE_EPSILON};
