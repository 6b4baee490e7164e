// In crates/indicator/src/types.rs

use serde::{Deserialize, Serialize};

/// The fixed parameter set of the indicator.
///
/// Injected once when a [`crate::SignalEngine`] is built and never changed
/// afterwards. The defaults are the only values the application uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    /// Number of candles in the high/low moving averages.
    pub trend_length: usize,
    /// Part of the configuration surface; the target ladder does not read it.
    pub target_multiplier: f64,
    /// Number of true-range values averaged into the volatility estimate.
    pub atr_period: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            trend_length: 34,
            target_multiplier: 1.0,
            atr_period: 14,
        }
    }
}

impl TrendSettings {
    /// Shortest history `SignalEngine::recompute` will act on: one full
    /// trend window plus the previous bar used for edge detection. Never
    /// less than two, since edges compare two candles.
    pub fn min_history(&self) -> usize {
        (self.trend_length + 1).max(2)
    }
}

/// Direction of the currently active signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    #[default]
    Neutral,
    Up,
    Down,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Neutral => "neutral",
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

/// Breakout condition of a single candle against the band.
///
/// Both flags false means the close sits inside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Condition {
    pub bullish: bool,
    pub bearish: bool,
}

/// The volatility-displaced moving-average band at one index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    /// SMA of highs plus the volatility estimate.
    pub upper: f64,
    /// SMA of lows minus the volatility estimate.
    pub lower: f64,
    /// The volatility estimate the band was widened by.
    pub volatility: f64,
}

/// Snapshot of the engine's current regime and price levels.
///
/// `entry_price == 0.0` means no signal has fired since construction or the
/// last reset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalState {
    pub trend: Trend,
    pub atr: f64,
    /// Last observed close.
    pub price: f64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub tp1: f64,
    pub tp2: f64,
    pub tp3: f64,
    pub is_bullish: bool,
    /// Set from outside the engine by whoever monitors price against the stop.
    pub stop_loss_hit: bool,
    pub has_initial_signal: bool,
}

impl SignalState {
    pub fn has_signal(&self) -> bool {
        self.entry_price != 0.0
    }

    /// Whether `price` is at or through the stop in the active direction.
    pub fn stop_breached(&self, price: f64) -> bool {
        if !self.has_signal() {
            return false;
        }
        if self.is_bullish {
            price <= self.stop_loss
        } else {
            price >= self.stop_loss
        }
    }

    pub fn targets(&self) -> [f64; 3] {
        [self.tp1, self.tp2, self.tp3]
    }
}
