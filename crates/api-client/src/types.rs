// In crates/api-client/src/types.rs

use core_types::Candle;
use reqwest::Client;
use serde_json::Value;

/// The client for the public Binance Futures market-data endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The base URL for the Binance Futures API.
    pub base_url: String,
}

/// One kline row as Binance returns it: a JSON array of mixed types.
///
/// `[0]` open time (ms), `[1..=4]` open/high/low/close, `[5]` volume, then
/// close time, quote volume, trade count and taker volumes, which are unused.
/// Prices arrive as strings; plain numbers are accepted too.
pub type RawKline = Vec<Value>;

/// Parses one numeric field, yielding NaN for anything that is not a number.
fn number(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Converts a single kline row. Rows that are too short, lack an open time,
/// or whose open price does not parse are rejected.
pub fn candle_from_row(row: &[Value]) -> Option<Candle> {
    if row.len() < 6 {
        return None;
    }

    let time_ms = row[0]
        .as_i64()
        .or_else(|| row[0].as_f64().map(|t| t as i64))?;

    let open = number(&row[1]);
    if open.is_nan() {
        return None;
    }

    Some(Candle {
        time: time_ms / 1000,
        open,
        high: number(&row[2]),
        low: number(&row[3]),
        close: number(&row[4]),
        volume: number(&row[5]),
    })
}

/// Converts exchange kline rows into candles, dropping malformed rows.
pub fn candles_from_rows(rows: &[RawKline]) -> Vec<Candle> {
    let candles: Vec<Candle> = rows.iter().filter_map(|row| candle_from_row(row)).collect();
    let dropped = rows.len() - candles.len();
    if dropped > 0 {
        tracing::warn!(dropped, "Dropped malformed kline rows.");
    }
    candles
}

/// Extracts a Binance error object (`{"code": .., "msg": ..}`) from a body.
pub fn api_error_from_body(body: &str) -> Option<crate::Error> {
    let value: Value = serde_json::from_str(body).ok()?;
    let code = value.get("code").and_then(Value::as_i64)?;
    let msg = value
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string();
    Some(crate::Error::ApiError { code, msg })
}
