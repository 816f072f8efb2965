#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bartwesthoff/hrfmp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the hrfmp Financial Modeling Prep client.
//!
//! This crate provides the building blocks shared by the client and the
//! local price-file cache:
//!
//! - [`Symbol`](types::Symbol) and [`DateRange`](types::DateRange) - Query parameters
//! - [`FiscalPeriod`](period::FiscalPeriod) - Annual or quarterly report period
//! - [`FmpConfig`](config::FmpConfig) - Endpoint, API key and price directory
//! - [`PriceFileCache`](cache::PriceFileCache) - Lookup of previously saved price files
//! - [`DataError`](error::DataError) - Error type shared by every operation

/// Price-file cache trait.
pub mod cache;
/// Client configuration.
pub mod config;
/// Error types for data operations.
pub mod error;
/// Fiscal period definitions.
pub mod period;
/// Query parameter types (Symbol, DateRange).
pub mod types;

// Re-export commonly used items at crate root
pub use cache::PriceFileCache;
pub use config::FmpConfig;
pub use error::{DataError, Result};
pub use period::FiscalPeriod;
pub use types::{DateRange, Symbol};
