//! No-op cache implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use hrfmp_core::{PriceFileCache, Result, Symbol};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::trace;

/// A no-op cache that doesn't store anything.
///
/// `load` always returns `Ok(None)` and `store` returns `Ok(None)`.
/// Useful for forcing every trading-day lookup through the API.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PriceFileCache for NoopCache {
    async fn load(&self, _symbol: &Symbol) -> Result<Option<DataFrame>> {
        trace!("NoopCache: load called, returning None");
        Ok(None)
    }

    async fn store(
        &self,
        _symbol: &Symbol,
        _data: &DataFrame,
        _end: NaiveDate,
    ) -> Result<Option<PathBuf>> {
        trace!("NoopCache: store called, doing nothing");
        Ok(None)
    }
}
