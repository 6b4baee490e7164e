// In crates/core-types/src/types.rs

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trading pair as the exchange spells it (e.g., "BTCUSDT").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Human-facing label, with the quote asset split off: "BTCUSDT" -> "BTC/USDT".
    pub fn display_name(&self) -> String {
        self.0.replacen("USDT", "/USDT", 1)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single OHLCV candle.
///
/// `time` is the candle's open time in unix seconds. Histories are always
/// handled in ascending `time` order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// The chart timeframes the application knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    #[default]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
}

impl Interval {
    pub const ALL: [Interval; 6] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::FourHours,
    ];

    /// The exchange spelling of the interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::FourHours => "4h",
        }
    }

    /// Length of one candle in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        match self {
            Interval::OneMinute => 60_000,
            Interval::FiveMinutes => 300_000,
            Interval::FifteenMinutes => 900_000,
            Interval::ThirtyMinutes => 1_800_000,
            Interval::OneHour => 3_600_000,
            Interval::FourHours => 14_400_000,
        }
    }

    /// How many candles to request for a chart of this interval.
    /// The short intervals get a longer history.
    pub fn default_limit(&self) -> u16 {
        match self {
            Interval::OneMinute | Interval::FiveMinutes => 150,
            _ => 100,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Interval::ALL
            .iter()
            .copied()
            .find(|interval| interval.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownInterval(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_splits_quote_asset() {
        assert_eq!(Symbol::new("BTCUSDT").display_name(), "BTC/USDT");
        assert_eq!(Symbol::new("1000SHIBUSDT").display_name(), "1000SHIB/USDT");
        assert_eq!(Symbol::new("ETHBTC").display_name(), "ETHBTC");
    }

    #[test]
    fn interval_parses_exchange_spelling() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>(), Ok(interval));
        }
        assert_eq!(
            "2h".parse::<Interval>(),
            Err(Error::UnknownInterval("2h".to_string()))
        );
    }

    #[test]
    fn short_intervals_request_more_history() {
        assert_eq!(Interval::OneMinute.default_limit(), 150);
        assert_eq!(Interval::FiveMinutes.default_limit(), 150);
        assert_eq!(Interval::OneHour.default_limit(), 100);
        assert_eq!(Interval::FourHours.duration_ms(), 4 * 3_600_000);
    }

    #[test]
    fn interval_serializes_as_exchange_spelling() {
        let json = serde_json::to_string(&Interval::FifteenMinutes).unwrap();
        assert_eq!(json, "\"15m\"");
    }
}
