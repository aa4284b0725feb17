//! # Server Sources
//!
//! Collaborators that materialize the provider's server list so the selector
//! can run over an in-memory slice.
//!
//! ## Contained Modules:
//!
//! - **`catalog`**: the raw listing + load statistics pair and its
//!   normalization into [`ServerRecord`]s.
//! - **`nordvpn`**: fetches both documents from the provider's public API.
//! - **`file`**: reads both documents from local JSON files.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Raw listing and its normalization.
pub mod catalog;
/// Local file source.
pub mod file;
/// Remote provider source.
pub mod nordvpn;

pub use catalog::{ServerCatalog, ServerStats};
pub use file::FileSource;
pub use nordvpn::{NordVpnSource, NORDVPN_API_URL};

use crate::selector::ServerRecord;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while obtaining the server list.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A local file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A document is not the JSON shape expected.
    #[error("invalid {what} document: {source}")]
    Json {
        /// Which document (`server list` or `server stats`).
        what: &'static str,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        /// Requested URL.
        url: String,
        /// Status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Transport failure after retries were exhausted.
    #[error("network error: {0:#}")]
    Network(#[from] anyhow::Error),
}

/// Anything that can produce a [`ServerCatalog`].
pub trait ServerSource {
    /// Human-readable origin, for logging.
    fn describe(&self) -> String;

    /// Retrieves the raw listing and load statistics.
    fn fetch(&self) -> impl Future<Output = Result<ServerCatalog, SourceError>> + Send;
}

/// Fetches from `source` and normalizes into candidate records.
pub async fn load_candidates<S: ServerSource + Sync>(
    source: &S,
) -> Result<Vec<ServerRecord>, SourceError> {
    log::info!("Loading server list from {}", source.describe());
    let catalog = source.fetch().await?;
    let listed = catalog.servers.len();
    let records = catalog.into_records();
    log::info!("Loaded {} servers ({} listed)", records.len(), listed);
    Ok(records)
}
