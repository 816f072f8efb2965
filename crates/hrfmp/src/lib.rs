#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bartwesthoff/hrfmp/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) client.
//!
//! [`FmpClient`] fetches historical prices, financial reports, earnings-call
//! transcripts and trading-day calendars from the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API. Price
//! data comes back as polars `DataFrame`s; reports and transcripts come back
//! as untouched JSON.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hrfmp::{FmpClient, FmpConfig};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FmpClient::new(FmpConfig::from_env()?);
//!
//!     // Last seven days for two tickers, one table tagged by `ticker`
//!     let prices = client.recent_prices(&["AAPL", "MSFT"], None, None).await?;
//!
//!     // Raw JSON reports
//!     let report = client.annual_report("AAPL", 2022).await?;
//!     let transcript = client.earnings_call_transcript("AAPL", 2023, 1).await?;
//!
//!     // Ascending trading days
//!     let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//!     let end = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
//!     let days = client.trading_days("AAPL", start, end).await?;
//!
//!     Ok(())
//! }
//! ```

mod prices;

use chrono::NaiveDate;
use hrfmp_cache::{LocalPriceFiles, NoopCache};
use polars::prelude::DataFrame;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, warn};

use prices::{PriceShape, concat_frames, decode_histories, price_frame, trading_day_frame};

pub use hrfmp_cache;
pub use hrfmp_core::{
    DataError, DateRange, FiscalPeriod, FmpConfig, PriceFileCache, Result, Symbol,
    types::parse_date,
};
pub use prices::{DATE_COLUMN, DROPPED_BATCH_COLUMNS, DROPPED_COLUMNS, TICKER_COLUMN};

/// Start of every saved full price history.
const FULL_HISTORY_START: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => panic!("invalid full history start"),
};

/// Financial Modeling Prep client.
///
/// Provides access to:
/// - Recent daily prices for one or many tickers
/// - Annual and quarterly financial reports (raw JSON)
/// - Earnings-call transcripts (raw JSON)
/// - Trading-day calendars, short-circuited by saved price files
///
/// Each operation issues at most one request. The underlying
/// `reqwest::Client` pools connections and is shared by clones.
#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    config: FmpConfig,
    cache: Arc<dyn PriceFileCache>,
}

impl fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpClient")
            .field("base_url", &self.config.base_url())
            .field("api_key", &"[REDACTED]")
            .field("cache", &self.cache)
            .finish()
    }
}

impl FmpClient {
    /// Create a client from a configuration.
    ///
    /// Saved price files are looked up in the configured price directory, if any.
    #[must_use]
    pub fn new(config: FmpConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client from the environment (see [`FmpConfig::from_env`]).
    ///
    /// # Errors
    /// Returns [`DataError::Config`] if `FMP_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        FmpConfig::from_env().map(Self::new)
    }

    /// Create a client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: FmpConfig) -> Self {
        let cache: Arc<dyn PriceFileCache> = match config.price_dir() {
            Some(dir) => Arc::new(LocalPriceFiles::new(dir)),
            None => Arc::new(NoopCache::new()),
        };
        Self {
            client,
            config,
            cache,
        }
    }

    /// Replace the saved price-file cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn PriceFileCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &FmpConfig {
        &self.config
    }

    /// Endpoint URL without the API key, safe to log.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.config.base_url())
    }

    /// Build a URL with the API key appended.
    fn url(&self, endpoint: &str) -> String {
        let url = self.endpoint_url(endpoint);
        if endpoint.contains('?') {
            format!("{url}&apikey={}", self.config.api_key())
        } else {
            format!("{url}?apikey={}", self.config.api_key())
        }
    }

    /// Make a GET request and decode the JSON response.
    async fn get(&self, endpoint: &str) -> Result<Value> {
        let display_url = self.endpoint_url(endpoint);
        debug!(url = %display_url, "FMP request");

        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status {
                status: status.as_u16(),
                url: display_url,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| DataError::Network(e.without_url().to_string()))?;

        let value: Value = serde_json::from_str(&text)
            .map_err(|e| DataError::Parse(format!("{e} in response from {display_url}")))?;

        // FMP reports key and plan problems as a 200 with an error object
        if let Some(message) = value.get("Error Message").and_then(Value::as_str) {
            return Err(DataError::Network(message.to_string()));
        }

        Ok(value)
    }

    /// Fetch recent daily prices for one or more tickers.
    ///
    /// Missing bounds default to the last seven days (see [`DateRange::resolve`]).
    ///
    /// With a single ticker the table holds every upstream field except
    /// `label`. With several tickers one batched request is made and
    /// `label`, `adjClose` and `unadjustedVolume` are dropped; per-ticker
    /// tables are stacked in request order. Requested tickers absent from
    /// the response are skipped. Every table ends with a `ticker` column.
    /// Rows keep upstream order (newest first).
    ///
    /// Tickers are trimmed and upper-cased (see [`Symbol`]), so a request
    /// for `"aapl"` is tagged `AAPL`. Duplicates after that normalization
    /// are requested once.
    ///
    /// Any failure is logged once at error level before being returned.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] when no tickers are given or a
    /// ticker or range is invalid, and network, status or parse errors from
    /// the request.
    pub async fn recent_prices<S: AsRef<str>>(
        &self,
        tickers: &[S],
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DataFrame> {
        let result = match DateRange::resolve(start, end) {
            Ok(range) => self.fetch_recent_prices(tickers, range).await,
            Err(e) => Err(e),
        };
        log_price_failure(tickers, result)
    }

    /// Same as [`FmpClient::recent_prices`] with `YYYY-MM-DD` string bounds.
    ///
    /// # Errors
    /// See [`FmpClient::recent_prices`]; malformed dates are
    /// [`DataError::InvalidParameter`].
    pub async fn recent_prices_between<S: AsRef<str>>(
        &self,
        tickers: &[S],
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DataFrame> {
        let parsed = start
            .map(parse_date)
            .transpose()
            .and_then(|start| Ok((start, end.map(parse_date).transpose()?)));
        let result = match parsed.and_then(|(start, end)| DateRange::resolve(start, end)) {
            Ok(range) => self.fetch_recent_prices(tickers, range).await,
            Err(e) => Err(e),
        };
        log_price_failure(tickers, result)
    }

    async fn fetch_recent_prices<S: AsRef<str>>(
        &self,
        tickers: &[S],
        range: DateRange,
    ) -> Result<DataFrame> {
        let symbols = unique_symbols(tickers)?;
        debug!(tickers = ?symbols, %range, "Getting recent stock info");

        match symbols.as_slice() {
            [] => Err(DataError::InvalidParameter(
                "at least one ticker is required".to_string(),
            )),
            [symbol] => self.historical_prices(symbol.as_str(), range).await,
            _ => self.fetch_batch_prices(&symbols, range).await,
        }
    }

    async fn fetch_batch_prices(&self, symbols: &[Symbol], range: DateRange) -> Result<DataFrame> {
        let joined = join_symbols(symbols);
        let endpoint = format!("v3/historical-price-full/{joined}?{}", range.query());
        let histories = decode_histories(self.get(&endpoint).await?)?;

        let mut frames = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let history = histories
                .iter()
                .find(|h| h.symbol.as_deref().map(Symbol::new).as_ref() == Some(symbol));
            match history {
                Some(history) => {
                    frames.push(price_frame(&history.historical, symbol, PriceShape::Batch)?);
                }
                None => warn!(symbol = %symbol, "No price data returned for ticker"),
            }
        }

        if frames.is_empty() {
            return Err(DataError::DataNotAvailable {
                symbol: joined,
                start: range.start().to_string(),
                end: range.end().to_string(),
            });
        }

        concat_frames(frames)
    }

    /// Fetch the daily price table of a single ticker.
    ///
    /// Holds every upstream field except `label`, plus a trailing `ticker`
    /// column, newest first.
    ///
    /// # Errors
    /// Returns [`DataError::DataNotAvailable`] if the API has no data for the
    /// ticker, and network, status or parse errors from the request.
    pub async fn historical_prices(&self, ticker: &str, range: DateRange) -> Result<DataFrame> {
        let symbol = Symbol::try_new(ticker)?;
        let rows = self.fetch_history(&symbol, range).await?;
        price_frame(&rows, &symbol, PriceShape::Full)
    }

    async fn fetch_history(
        &self,
        symbol: &Symbol,
        range: DateRange,
    ) -> Result<Vec<prices::FmpHistoricalPrice>> {
        let endpoint = format!(
            "v3/historical-price-full/{}?{}",
            symbol.as_str(),
            range.query()
        );
        let histories = decode_histories(self.get(&endpoint).await?)?;

        histories
            .into_iter()
            .next()
            .map(|history| history.historical)
            .ok_or_else(|| DataError::DataNotAvailable {
                symbol: symbol.to_string(),
                start: range.start().to_string(),
                end: range.end().to_string(),
            })
    }

    /// Fetch a financial report for a fiscal year or quarter as raw JSON.
    ///
    /// # Errors
    /// Returns network, status or parse errors from the request.
    pub async fn financial_report(
        &self,
        symbol: &str,
        year: i32,
        period: FiscalPeriod,
    ) -> Result<Value> {
        let symbol = Symbol::try_new(symbol)?;
        let endpoint = format!(
            "v4/financial-reports-json?symbol={}&year={year}&period={period}",
            symbol.as_str()
        );
        self.get(&endpoint).await
    }

    /// Fetch the full-year financial report as raw JSON.
    ///
    /// # Errors
    /// Returns network, status or parse errors from the request.
    pub async fn annual_report(&self, symbol: &str, year: i32) -> Result<Value> {
        self.financial_report(symbol, year, FiscalPeriod::Annual)
            .await
    }

    /// Fetch a quarterly financial report as raw JSON.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] unless `quarter` is in `1..=4`,
    /// and network, status or parse errors from the request.
    pub async fn quarterly_report(&self, symbol: &str, year: i32, quarter: u8) -> Result<Value> {
        let period = FiscalPeriod::quarter(quarter)?;
        self.financial_report(symbol, year, period).await
    }

    /// Fetch an earnings-call transcript as raw JSON.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] unless `quarter` is in `1..=4`,
    /// and network, status or parse errors from the request.
    pub async fn earnings_call_transcript(
        &self,
        symbol: &str,
        year: i32,
        quarter: u8,
    ) -> Result<Value> {
        let symbol = Symbol::try_new(symbol)?;
        FiscalPeriod::quarter(quarter)?;
        let endpoint = format!(
            "v3/earning_call_transcript/{}?quarter={quarter}&year={year}",
            symbol.as_str()
        );
        self.get(&endpoint).await
    }

    /// Fetch the ascending trading days of a ticker between `start` and `end`.
    ///
    /// If the price-file cache holds a saved full history for the ticker,
    /// that table is returned as saved and `start`/`end` are not applied to
    /// it, not even to check their order. Otherwise the API is asked for the
    /// window and a single `date` column, oldest first and without
    /// duplicates, is returned.
    ///
    /// The ticker is upper-cased before the lookup, so `"aapl"` finds
    /// `AAPL price 1970-01-01 ...` files only.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] for an invalid ticker or, when
    /// no saved file exists, an inverted range. Cache errors and network,
    /// status or parse errors from the request are returned as well.
    pub async fn trading_days(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        let symbol = Symbol::try_new(ticker)?;

        if let Some(saved) = self.cache.load(&symbol).await? {
            debug!(symbol = %symbol, rows = saved.height(), "Using saved price file");
            return Ok(saved);
        }

        let range = DateRange::new(start, end)?;
        let rows = self.fetch_history(&symbol, range).await?;
        trading_day_frame(&rows)
    }

    /// Fetch the full price history of a ticker up to `end` (default today)
    /// and save it through the price-file cache.
    ///
    /// Returns the written path, or `None` if the cache does not persist.
    ///
    /// # Errors
    /// Returns cache errors and network, status or parse errors from the request.
    pub async fn save_full_history(
        &self,
        ticker: &str,
        end: Option<NaiveDate>,
    ) -> Result<Option<PathBuf>> {
        let range = DateRange::resolve(Some(FULL_HISTORY_START), end)?;
        let symbol = Symbol::try_new(ticker)?;
        let prices = self.historical_prices(symbol.as_str(), range).await?;
        self.cache.store(&symbol, &prices, range.end()).await
    }
}

fn unique_symbols<S: AsRef<str>>(tickers: &[S]) -> Result<Vec<Symbol>> {
    let mut seen = HashSet::new();
    let mut symbols = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let symbol = Symbol::try_new(ticker.as_ref())?;
        if seen.insert(symbol.clone()) {
            symbols.push(symbol);
        }
    }
    Ok(symbols)
}

fn join_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

fn log_price_failure<S: AsRef<str>>(
    tickers: &[S],
    result: Result<DataFrame>,
) -> Result<DataFrame> {
    if let Err(e) = &result {
        let tickers: Vec<&str> = tickers.iter().map(|t| t.as_ref()).collect();
        error!(tickers = ?tickers, error = %e, "Could not get recent stock info");
    }
    result
}
