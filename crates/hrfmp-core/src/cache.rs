//! Cache trait for previously saved price files.
//!
//! This module defines the [`PriceFileCache`] trait the client consults before
//! asking the API for a trading-day calendar.

use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::path::PathBuf;

use crate::{error::Result, types::Symbol};

/// File-name prefix shared by every saved full price history of a symbol.
///
/// Saved histories start at the Unix epoch, so the first date in the name
/// is always `1970-01-01`.
#[must_use]
pub fn price_file_prefix(symbol: &Symbol) -> String {
    format!("{} price 1970-01-01", symbol.as_str())
}

/// Store of full price histories keyed by symbol only.
///
/// A hit is returned verbatim; implementations never filter it by date.
#[async_trait]
pub trait PriceFileCache: Send + Sync + std::fmt::Debug {
    /// Loads the saved price table for a symbol.
    ///
    /// Returns `Ok(Some(df))` if a saved file exists, `Ok(None)` if not.
    async fn load(&self, symbol: &Symbol) -> Result<Option<DataFrame>>;

    /// Saves a price table for a symbol whose history ends at `end`.
    ///
    /// Returns the path written, or `None` if the cache does not persist anything.
    async fn store(
        &self,
        symbol: &Symbol,
        data: &DataFrame,
        end: NaiveDate,
    ) -> Result<Option<PathBuf>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_file_prefix() {
        assert_eq!(
            price_file_prefix(&Symbol::new("aapl")),
            "AAPL price 1970-01-01"
        );
    }
}
