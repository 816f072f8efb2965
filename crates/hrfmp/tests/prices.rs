mod common;

use chrono::NaiveDate;
use hrfmp::{DROPPED_BATCH_COLUMNS, DataError, DateRange, TICKER_COLUMN};
use httpmock::Method::GET;
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[tokio::test]
async fn single_ticker_rows_are_tagged_and_label_dropped() {
    let server = common::setup_server();
    let mock = common::mock_history(
        &server,
        "AAPL",
        "2023-01-01",
        "2023-01-31",
        common::fixture("historical_AAPL"),
    );

    let df = common::client(&server)
        .recent_prices(&["AAPL"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(df.height(), 20);
    let columns = common::column_names(&df);
    assert!(!columns.contains(&"label".to_string()));
    assert!(columns.contains(&"adjClose".to_string()));
    assert!(columns.contains(&"unadjustedVolume".to_string()));
    assert!(common::strings(&df, TICKER_COLUMN).iter().all(|t| t == "AAPL"));

    // Upstream order (newest first) is kept
    let dates = common::strings(&df, "date");
    assert_eq!(dates.first().map(String::as_str), Some("2023-01-31"));
    assert_eq!(dates.last().map(String::as_str), Some("2023-01-03"));
}

#[tokio::test]
async fn multi_ticker_request_is_batched_and_partitioned() {
    let server = common::setup_server();
    let mock = common::mock_history(
        &server,
        "AAPL,MSFT",
        "2023-01-01",
        "2023-01-31",
        common::fixture("historical_AAPL_MSFT"),
    );

    let df = common::client(&server)
        .recent_prices_between(&["AAPL", "MSFT"], Some("2023-01-01"), Some("2023-01-31"))
        .await
        .unwrap();
    mock.assert_hits(1);

    let columns = common::column_names(&df);
    for dropped in DROPPED_BATCH_COLUMNS {
        assert!(!columns.contains(&dropped.to_string()), "{dropped} present");
    }

    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (ticker, day) in common::strings(&df, TICKER_COLUMN)
        .into_iter()
        .zip(common::strings(&df, "date"))
    {
        groups.entry(ticker).or_default().push(day);
    }
    assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["AAPL", "MSFT"]);
    for days in groups.values() {
        assert_eq!(days.len(), 20);
        let mut unique = days.clone();
        unique.dedup();
        assert_eq!(&unique, days);
    }

    // AAPL block first, MSFT block second
    let tickers = common::strings(&df, TICKER_COLUMN);
    assert!(tickers[..20].iter().all(|t| t == "AAPL"));
    assert!(tickers[20..].iter().all(|t| t == "MSFT"));
}

#[tokio::test]
async fn tickers_missing_upstream_are_skipped() {
    let server = common::setup_server();
    let mock = common::mock_history(
        &server,
        "AAPL,ZZZZ",
        "2023-01-01",
        "2023-01-31",
        common::fixture("historical_AAPL"),
    );

    let df = common::client(&server)
        .recent_prices(&["AAPL", "ZZZZ"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap();
    mock.assert();

    assert_eq!(df.height(), 20);
    assert!(common::strings(&df, TICKER_COLUMN).iter().all(|t| t == "AAPL"));
    assert!(!common::column_names(&df).contains(&"adjClose".to_string()));
}

#[tokio::test]
async fn duplicate_tickers_collapse_to_single_request() {
    let server = common::setup_server();
    let mock = common::mock_history(
        &server,
        "AAPL",
        "2023-01-01",
        "2023-01-31",
        common::fixture("historical_AAPL"),
    );

    let df = common::client(&server)
        .recent_prices(&["AAPL", "aapl"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap();
    mock.assert();
    assert_eq!(df.height(), 20);
    // Tags carry the normalized ticker
    assert!(common::strings(&df, TICKER_COLUMN).iter().all(|t| t == "AAPL"));
}

#[tokio::test]
async fn default_range_is_last_seven_days() {
    let server = common::setup_server();
    let range = DateRange::resolve(None, None).unwrap();
    let from = range.start().to_string();
    let to = range.end().to_string();
    let mock = common::mock_history(
        &server,
        "AAPL",
        &from,
        &to,
        r#"{"symbol":"AAPL","historical":[]}"#.to_string(),
    );

    let df = common::client(&server)
        .recent_prices(&["AAPL"], None, None)
        .await
        .unwrap();
    mock.assert();
    assert_eq!(df.height(), 0);
    assert_eq!((range.end() - range.start()).num_days(), 7);
}

#[tokio::test]
async fn unknown_single_ticker_is_data_not_available() {
    let server = common::setup_server();
    let mock = common::mock_history(&server, "ZZZZ", "2023-01-01", "2023-01-31", "{}".into());

    let err = common::client(&server)
        .recent_prices(&["ZZZZ"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();
    mock.assert();
    assert!(matches!(err, DataError::DataNotAvailable { .. }));
}

#[tokio::test]
async fn http_status_error_hides_api_key() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v3/historical-price-full/FAIL");
        then.status(500).body("oops");
    });

    let err = common::client(&server)
        .recent_prices(&["FAIL"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();
    mock.assert();

    match err {
        DataError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.contains("/v3/historical-price-full/FAIL"));
            assert!(!url.contains(common::API_KEY));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_message_payload_is_network_error() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v3/historical-price-full/AAPL");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"Error Message":"Invalid API KEY."}"#);
    });

    let err = common::client(&server)
        .recent_prices(&["AAPL"], date(2023, 1, 1), date(2023, 1, 31))
        .await
        .unwrap_err();
    mock.assert();
    assert!(matches!(err, DataError::Network(msg) if msg.contains("Invalid API KEY")));
}
