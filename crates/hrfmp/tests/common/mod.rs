#![allow(dead_code)]

use hrfmp::{FmpClient, FmpConfig};
use httpmock::{Method::GET, Mock, MockServer};
use polars::prelude::*;
use std::{fs, path::Path};

pub const API_KEY: &str = "test_key";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(format!("{name}.json"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn config(server: &MockServer) -> FmpConfig {
    FmpConfig::new(API_KEY)
        .with_base_url(server.base_url())
        .without_price_dir()
}

pub fn client(server: &MockServer) -> FmpClient {
    FmpClient::new(config(server))
}

pub fn mock_history<'a>(
    server: &'a MockServer,
    tickers: &str,
    from: &str,
    to: &str,
    body: String,
) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path(format!("/v3/historical-price-full/{tickers}"))
            .query_param("from", from)
            .query_param("to", to)
            .query_param("apikey", API_KEY);
        then.status(200)
            .header("content-type", "application/json")
            .body(body);
    })
}

pub fn strings(df: &DataFrame, column: &str) -> Vec<String> {
    df.column(column)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap().to_string())
        .collect()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|c| c.to_string())
        .collect()
}
