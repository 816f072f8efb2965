#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bartwesthoff/hrfmp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Price-file cache implementations for the hrfmp client.
//!
//! This crate provides implementations of the [`PriceFileCache`] trait from `hrfmp-core`:
//!
//! - [`LocalPriceFiles`] - CSV files in a local directory
//! - [`NoopCache`] - Cache that never hits and doesn't store anything

/// Directory-backed cache implementation.
pub mod local;
/// No-op cache implementation.
pub mod noop;

// Re-export the trait for convenience
pub use hrfmp_core::PriceFileCache;

// Re-export implementations
pub use local::LocalPriceFiles;
pub use noop::NoopCache;
