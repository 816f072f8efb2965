//! Fiscal period definitions.
//!
//! [`FiscalPeriod`] selects the full fiscal year or one of its four quarters
//! and renders as the `period` query value the reports endpoint expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Reporting period of a financial report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalPeriod {
    /// Full fiscal year.
    #[default]
    #[serde(rename = "FY")]
    Annual,
    /// First fiscal quarter.
    Q1,
    /// Second fiscal quarter.
    Q2,
    /// Third fiscal quarter.
    Q3,
    /// Fourth fiscal quarter.
    Q4,
}

impl FiscalPeriod {
    /// Returns the quarter for a 1-based quarter number.
    ///
    /// # Errors
    /// Returns [`DataError::InvalidParameter`] unless `quarter` is in `1..=4`.
    pub fn quarter(quarter: u8) -> Result<Self, DataError> {
        match quarter {
            1 => Ok(Self::Q1),
            2 => Ok(Self::Q2),
            3 => Ok(Self::Q3),
            4 => Ok(Self::Q4),
            other => Err(DataError::InvalidParameter(format!(
                "quarter must be between 1 and 4, got {other}"
            ))),
        }
    }

    /// Returns the value used for the `period` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "FY",
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

impl fmt::Display for FiscalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FiscalPeriod {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FY" | "ANNUAL" => Ok(Self::Annual),
            "Q1" => Ok(Self::Q1),
            "Q2" => Ok(Self::Q2),
            "Q3" => Ok(Self::Q3),
            "Q4" => Ok(Self::Q4),
            _ => Err(DataError::InvalidParameter(format!(
                "unknown fiscal period: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_bounds() {
        assert_eq!(FiscalPeriod::quarter(1).unwrap(), FiscalPeriod::Q1);
        assert_eq!(FiscalPeriod::quarter(4).unwrap(), FiscalPeriod::Q4);
        assert!(matches!(
            FiscalPeriod::quarter(0),
            Err(DataError::InvalidParameter(_))
        ));
        assert!(FiscalPeriod::quarter(5).is_err());
    }

    #[test]
    fn test_display_matches_query_value() {
        assert_eq!(FiscalPeriod::Annual.to_string(), "FY");
        assert_eq!(FiscalPeriod::Q3.to_string(), "Q3");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("fy".parse::<FiscalPeriod>().unwrap(), FiscalPeriod::Annual);
        assert_eq!(" q2 ".parse::<FiscalPeriod>().unwrap(), FiscalPeriod::Q2);
        assert!("H1".parse::<FiscalPeriod>().is_err());
    }

    #[test]
    fn test_serde_uses_query_values() {
        let json = serde_json::to_string(&FiscalPeriod::Annual).unwrap();
        assert_eq!(json, "\"FY\"");
        let q: FiscalPeriod = serde_json::from_str("\"Q4\"").unwrap();
        assert_eq!(q, FiscalPeriod::Q4);
    }
}
