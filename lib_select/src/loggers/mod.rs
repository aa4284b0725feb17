//! # Loggers
//!
//! Process-wide logging setup for the binaries. Library code only talks to
//! the `log` facade; this module installs the `fern` backend behind it.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Console + optional file logger.
pub mod loggerlocal;

pub use loggerlocal::setup_logging;
