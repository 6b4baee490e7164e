// In crates/api-client/src/lib.rs

use app_config::types::BinanceSettings;
use async_trait::async_trait;
use core_types::{Candle, Interval, Symbol};
use std::time::Duration;

pub mod error;
pub mod synthetic;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use synthetic::SyntheticFeed;
pub use types::*;

/// A source of candle history for one symbol and timeframe.
///
/// Implementations return candles in ascending time order with malformed
/// rows already removed.
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// The name of the provider (e.g., "binance-futures", "synthetic").
    fn name(&self) -> &'static str;

    async fn fetch(&self, symbol: &Symbol, interval: Interval) -> Result<Vec<Candle>>;
}

impl ApiClient {
    /// Constructs a new ApiClient from BinanceSettings.
    pub fn new(settings: &BinanceSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ApiClient {
            http_client,
            base_url: settings.rest_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches the most recent klines (candlesticks).
    ///
    /// This corresponds to the `GET /fapi/v1/klines` endpoint.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The symbol to fetch klines for.
    /// * `interval`: The kline interval.
    /// * `limit`: Optional number of klines to return (max 1500, default 500).
    pub async fn get_klines(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: Option<u16>,
    ) -> Result<Vec<Candle>> {
        let mut params = format!("symbol={}&interval={}", symbol.0, interval);
        if let Some(l) = limit {
            params.push_str(&format!("&limit={}", l));
        }

        let url = format!("{}/fapi/v1/klines?{}", self.base_url, params);
        tracing::debug!(url = %url, "Requesting klines.");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;
        let status = response.status();
        let response_body = response.text().await.map_err(Error::RequestFailed)?;

        if !status.is_success() {
            return Err(api_error_from_body(&response_body)
                .unwrap_or(Error::HttpStatus { status: status.as_u16() }));
        }

        // Binance answers with an error object instead of rows on bad input.
        let rows: Vec<RawKline> = serde_json::from_str(&response_body)
            .map_err(|e| api_error_from_body(&response_body).unwrap_or(Error::DeserializationFailed(e)))?;

        let candles = candles_from_rows(&rows);
        tracing::debug!(symbol = %symbol, %interval, count = candles.len(), "Received klines.");
        Ok(candles)
    }
}

#[async_trait]
impl CandleProvider for ApiClient {
    fn name(&self) -> &'static str {
        "binance-futures"
    }

    async fn fetch(&self, symbol: &Symbol, interval: Interval) -> Result<Vec<Candle>> {
        self.get_klines(symbol, interval, Some(interval.default_limit()))
            .await
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &BinanceSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(url: &str) -> BinanceSettings {
        BinanceSettings {
            rest_base_url: url.to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new(&settings("https://fapi.binance.com/")).unwrap();
        assert_eq!(client.base_url, "https://fapi.binance.com");
        assert_eq!(client.name(), "binance-futures");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_request_error() {
        // Reserve a free port, then release it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = ApiClient::new(&settings(&format!("http://127.0.0.1:{port}"))).unwrap();
        let result = client
            .fetch(&Symbol::new("BTCUSDT"), Interval::OneHour)
            .await;
        assert!(matches!(result, Err(Error::RequestFailed(_))));
    }
}
