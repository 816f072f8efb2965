//! Historical price payloads and the tables built from them.

use chrono::{Datelike, NaiveDate};
use hrfmp_core::{DataError, Result, Symbol, types::DATE_FORMAT};
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;

/// Name of the trading date column.
pub const DATE_COLUMN: &str = "date";

/// Name of the column tagging each row with its ticker.
pub const TICKER_COLUMN: &str = "ticker";

/// Upstream fields that never reach a price table.
pub const DROPPED_COLUMNS: &[&str] = &["label"];

/// Upstream fields additionally dropped from batched (multi-ticker) tables.
pub const DROPPED_BATCH_COLUMNS: &[&str] = &["label", "adjClose", "unadjustedVolume"];

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Which columns a price table keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PriceShape {
    /// Single-ticker request: every field except `label`.
    Full,
    /// Batched request: also without `adjClose` and `unadjustedVolume`.
    Batch,
}

/// One day of a historical price payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FmpHistoricalPrice {
    pub(crate) date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    adj_close: Option<f64>,
    volume: Option<f64>,
    unadjusted_volume: Option<f64>,
    change: Option<f64>,
    change_percent: Option<f64>,
    vwap: Option<f64>,
    change_over_time: Option<f64>,
}

/// Price history of one ticker.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FmpTickerHistory {
    #[serde(default)]
    pub(crate) symbol: Option<String>,
    #[serde(default)]
    pub(crate) historical: Vec<FmpHistoricalPrice>,
}

/// Batched response: one entry per matched ticker.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpHistoricalStockList {
    historical_stock_list: Vec<FmpTickerHistory>,
}

/// Decodes either response shape of `historical-price-full`.
///
/// Batched requests answer `{"historicalStockList": [...]}`, single requests
/// (and batched requests where only one symbol matched) answer
/// `{"symbol": .., "historical": [...]}`. Unknown symbols yield `{}` or `[]`.
pub(crate) fn decode_histories(value: Value) -> Result<Vec<FmpTickerHistory>> {
    match value {
        Value::Object(map) if map.contains_key("historicalStockList") => {
            serde_json::from_value::<FmpHistoricalStockList>(Value::Object(map))
                .map(|list| list.historical_stock_list)
                .map_err(|e| DataError::Parse(e.to_string()))
        }
        Value::Object(map) if map.contains_key("historical") => {
            serde_json::from_value::<FmpTickerHistory>(Value::Object(map))
                .map(|history| vec![history])
                .map_err(|e| DataError::Parse(e.to_string()))
        }
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Array(items) if items.is_empty() => Ok(Vec::new()),
        other => Err(DataError::Parse(format!(
            "unexpected historical price payload: {other}"
        ))),
    }
}

/// Parses an upstream date, ignoring any time-of-day suffix.
pub(crate) fn parse_price_date(date: &str) -> Result<NaiveDate> {
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| DataError::Parse(format!("invalid date {date:?}: {e}")))
}

/// Builds a polars `Date` column.
pub(crate) fn date_column(name: &str, dates: &[NaiveDate]) -> Result<Column> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();
    Column::new(name.into(), days)
        .cast(&DataType::Date)
        .map_err(|e| DataError::Parse(e.to_string()))
}

fn float_column(
    name: &str,
    rows: &[FmpHistoricalPrice],
    field: impl Fn(&FmpHistoricalPrice) -> Option<f64>,
) -> Column {
    Column::new(name.into(), rows.iter().map(field).collect::<Vec<_>>())
}

fn int_column(
    name: &str,
    rows: &[FmpHistoricalPrice],
    field: impl Fn(&FmpHistoricalPrice) -> Option<f64>,
) -> Column {
    let values: Vec<Option<i64>> = rows
        .iter()
        .map(|r| field(r).map(|v| v.round() as i64))
        .collect();
    Column::new(name.into(), values)
}

/// Builds one ticker's price table, keeping upstream row order.
pub(crate) fn price_frame(
    rows: &[FmpHistoricalPrice],
    ticker: &Symbol,
    shape: PriceShape,
) -> Result<DataFrame> {
    let dates = rows
        .iter()
        .map(|r| parse_price_date(&r.date))
        .collect::<Result<Vec<_>>>()?;

    let mut columns = vec![
        date_column(DATE_COLUMN, &dates)?,
        float_column("open", rows, |r| r.open),
        float_column("high", rows, |r| r.high),
        float_column("low", rows, |r| r.low),
        float_column("close", rows, |r| r.close),
    ];
    if shape == PriceShape::Full {
        columns.push(float_column("adjClose", rows, |r| r.adj_close));
    }
    columns.push(int_column("volume", rows, |r| r.volume));
    if shape == PriceShape::Full {
        columns.push(int_column("unadjustedVolume", rows, |r| r.unadjusted_volume));
    }
    columns.extend([
        float_column("change", rows, |r| r.change),
        float_column("changePercent", rows, |r| r.change_percent),
        float_column("vwap", rows, |r| r.vwap),
        float_column("changeOverTime", rows, |r| r.change_over_time),
        Column::new(TICKER_COLUMN.into(), vec![ticker.as_str(); rows.len()]),
    ]);

    DataFrame::new(columns).map_err(|e| DataError::Parse(e.to_string()))
}

/// Stacks per-ticker tables in order.
pub(crate) fn concat_frames(mut frames: Vec<DataFrame>) -> Result<DataFrame> {
    if frames.len() <= 1 {
        return Ok(frames.pop().unwrap_or_else(DataFrame::empty));
    }

    concat(
        frames.into_iter().map(IntoLazy::lazy).collect::<Vec<_>>(),
        UnionArgs::default(),
    )
    .and_then(LazyFrame::collect)
    .map_err(|e| DataError::Parse(e.to_string()))
}

/// Single `date` column, ascending and without duplicates.
pub(crate) fn trading_day_frame(rows: &[FmpHistoricalPrice]) -> Result<DataFrame> {
    let mut dates = rows
        .iter()
        .map(|r| parse_price_date(&r.date))
        .collect::<Result<Vec<_>>>()?;
    // Upstream is newest-first
    dates.sort_unstable();
    dates.dedup();

    DataFrame::new(vec![date_column(DATE_COLUMN, &dates)?])
        .map_err(|e| DataError::Parse(e.to_string()))
}
