//! Directory-backed price-file cache.

use async_trait::async_trait;
use chrono::NaiveDate;
use hrfmp_core::{DataError, PriceFileCache, Result, Symbol, cache::price_file_prefix};
use polars::prelude::*;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Cache of full price histories stored as CSV files in one directory.
///
/// Files are matched by name prefix only (`"<SYMBOL> price 1970-01-01"`), so a
/// hit carries whatever date span was saved, independent of the span a caller
/// asks for. The directory is not scanned recursively. Symbols are
/// upper-case, so only upper-case file names match.
#[derive(Debug, Clone)]
pub struct LocalPriceFiles {
    dir: PathBuf,
}

impl LocalPriceFiles {
    /// Create a cache rooted at `dir`. The directory need not exist yet.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory scanned by this cache.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the first saved file for `symbol`, in file-name order.
    ///
    /// A missing directory counts as a miss.
    ///
    /// # Errors
    /// Returns [`DataError::Cache`] if the directory exists but cannot be read.
    pub fn find(&self, symbol: &Symbol) -> Result<Option<PathBuf>> {
        find_in(&self.dir, &price_file_prefix(symbol))
    }

    /// Name of the file written by [`PriceFileCache::store`].
    #[must_use]
    pub fn file_name(symbol: &Symbol, end: NaiveDate) -> String {
        format!("{} {end}.csv", price_file_prefix(symbol))
    }
}

fn find_in(dir: &Path, prefix: &str) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(dir = %dir.display(), "Price directory does not exist");
            return Ok(None);
        }
        Err(e) => return Err(DataError::Cache(format!("{}: {e}", dir.display()))),
    };

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::Cache(e.to_string()))?;
        let is_file = entry.file_type().is_ok_and(|t| t.is_file());
        if is_file && entry.file_name().to_string_lossy().starts_with(prefix) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    Ok(matches.into_iter().next())
}

fn read_csv(path: &Path) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::Cache(format!("{}: {e}", path.display())))
}

fn write_csv(path: &Path, mut data: DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DataError::Cache(format!("{}: {e}", parent.display())))?;
    }
    let mut file =
        File::create(path).map_err(|e| DataError::Cache(format!("{}: {e}", path.display())))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut data)
        .map_err(|e| DataError::Cache(format!("{}: {e}", path.display())))
}

#[async_trait]
impl PriceFileCache for LocalPriceFiles {
    #[instrument(skip(self), fields(symbol = %symbol, dir = %self.dir.display()))]
    async fn load(&self, symbol: &Symbol) -> Result<Option<DataFrame>> {
        let dir = self.dir.clone();
        let prefix = price_file_prefix(symbol);

        tokio::task::spawn_blocking(move || -> Result<Option<_>> {
            let Some(path) = find_in(&dir, &prefix)? else {
                debug!("No saved price file");
                return Ok(None);
            };
            let df = read_csv(&path)?;
            debug!(path = %path.display(), rows = df.height(), "Loaded saved price file");
            Ok(Some(df))
        })
        .await
        .map_err(|e| DataError::Cache(e.to_string()))?
    }

    #[instrument(skip(self, data), fields(symbol = %symbol, dir = %self.dir.display()))]
    async fn store(
        &self,
        symbol: &Symbol,
        data: &DataFrame,
        end: NaiveDate,
    ) -> Result<Option<PathBuf>> {
        let path = self.dir.join(Self::file_name(symbol, end));
        let data = data.clone();

        tokio::task::spawn_blocking(move || -> Result<Option<_>> {
            let rows = data.height();
            write_csv(&path, data)?;
            debug!(path = %path.display(), rows, "Saved price file");
            Ok(Some(path))
        })
        .await
        .map_err(|e| DataError::Cache(e.to_string()))?
    }
}
