//! # Data Retrieval Module
//!
//! Generic HTTP plumbing shared by the remote server sources.
//!
//! - **`ky_http`**: an asynchronous JSON `ApiClient` built on `reqwest` and
//!   `reqwest-middleware`, with exponential-backoff retries for transient
//!   failures.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Generic HTTP API client with retry middleware.
pub mod ky_http;

/// Test-only HTTP responder shared by the client and source tests.
#[cfg(test)]
pub(crate) mod mock;
