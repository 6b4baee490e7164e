// In crates/app-config/src/types.rs

use core_types::Interval;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the Binance API.
    pub binance: BinanceSettings,
    /// What to chart and how often to refresh it.
    #[serde(default)]
    pub chart: ChartSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BinanceSettings {
    /// The REST API base URL for Binance Futures.
    pub rest_base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChartSettings {
    /// Symbol to open when none is requested on the command line.
    #[serde(default)]
    pub default_symbol: Option<String>,
    #[serde(default = "default_interval")]
    pub default_interval: Interval,
    /// Seconds between refreshes in `watch` mode.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Fewer fetched candles than this counts as a failed load.
    #[serde(default = "default_min_candles")]
    pub min_candles: usize,
    /// CSV file with a `binance_symbol` column.
    #[serde(default = "default_tickers_path")]
    pub tickers_path: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_symbol: None,
            default_interval: default_interval(),
            refresh_secs: default_refresh_secs(),
            min_candles: default_min_candles(),
            tickers_path: default_tickers_path(),
        }
    }
}

/// Helper functions for serde defaults
fn default_log_level() -> String { "info".to_string() }
fn default_request_timeout() -> u64 { 10 }
fn default_interval() -> Interval { Interval::OneHour }
fn default_refresh_secs() -> u64 { 3600 }
fn default_min_candles() -> usize { 30 }
fn default_tickers_path() -> String { "tickers.csv".to_string() }
