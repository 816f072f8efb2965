//! Query parameter types.
//!
//! - [`Symbol`] - Exchange-listed ticker
//! - [`DateRange`] - Inclusive calendar date window for price requests

use chrono::{Local, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DataError, Result};

/// Date format used by the FMP API for query values and payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of days the default price window reaches back from today.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation, so `"aapl"` and `"AAPL"`
/// name the same ticker. Validated symbols hold only ASCII letters, digits,
/// `.`, `-` and `^` (`BRK.B`, `BF-B`, `^GSPC`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Creates a symbol, rejecting values that cannot be sent as a ticker.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] for empty symbols or symbols
    /// containing anything other than ASCII letters, digits, `.`, `-` or `^`.
    pub fn try_new(s: impl Into<String>) -> Result<Self> {
        let symbol = Self::new(s);
        symbol.validate()?;
        Ok(symbol)
    }

    /// Checks that the symbol is usable in an FMP request.
    ///
    /// # Errors
    /// See [`Symbol::try_new`].
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(DataError::InvalidParameter(
                "symbol must not be empty".to_string(),
            ));
        }
        if let Some(c) = self.0.chars().find(|&c| !is_symbol_char(c)) {
            return Err(DataError::InvalidParameter(format!(
                "symbol {} contains unsupported character {c:?}",
                self.0
            )));
        }
        Ok(())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^')
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_new(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
/// Returns [`DataError::InvalidParameter`] if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| DataError::InvalidParameter(format!("invalid date {s:?}: {e}")))
}

/// Inclusive calendar date window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both inclusive.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DataError::InvalidParameter(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] for malformed dates or an inverted range.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Fills in missing bounds relative to the local current date.
    ///
    /// A missing start defaults to seven days before today and a missing end
    /// to today. Each bound is defaulted independently.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] if the resolved range is inverted.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        Self::resolve_at(start, end, Local::now().date_naive())
    }

    /// Same as [`DateRange::resolve`] with an explicit "today".
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] if the resolved range is inverted.
    pub fn resolve_at(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self> {
        let start = start.unwrap_or(today - TimeDelta::days(DEFAULT_LOOKBACK_DAYS));
        let end = end.unwrap_or(today);
        Self::new(start, end)
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Query string fragment for the historical price endpoints.
    #[must_use]
    pub fn query(&self) -> String {
        format!(
            "from={}&to={}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
