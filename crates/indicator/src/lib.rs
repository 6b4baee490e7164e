// In crates/indicator/src/lib.rs

//! The trend signal core.
//!
//! [`condition`] decides, for a single candle, whether its close broke out of
//! the volatility-displaced moving-average band. [`engine::SignalEngine`]
//! watches for the bar where that condition flips on and only then fixes a new
//! entry, stop-loss and target ladder.

pub mod condition;
pub mod engine;
pub mod types;

pub use condition::{band, evaluate, true_range, volatility};
pub use engine::{Recompute, SignalEngine, TriggerCause};
pub use types::{Band, Condition, SignalState, Trend, TrendSettings};

/// Damping applied to the average true range before it is used to widen the band.
pub const VOLATILITY_DAMPING: f64 = 0.3;

/// Take-profit offsets, in multiples of the volatility estimate.
pub const TARGET_STEPS: [f64; 3] = [5.0, 10.0, 15.0];

#[cfg(test)]
pub(crate) mod test_support {
    use core_types::Candle;

    /// A candle with `open = high = low = close = price`.
    pub fn flat(time: i64, price: f64) -> Candle {
        Candle {
            time,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1000.0,
        }
    }

    /// `count` flat candles at `price`, one minute apart.
    pub fn flat_history(count: usize, price: f64) -> Vec<Candle> {
        (0..count).map(|i| flat(i as i64 * 60, price)).collect()
    }

    /// Appends a candle with the given range, opening at the previous close.
    pub fn push(history: &mut Vec<Candle>, high: f64, low: f64, close: f64) {
        let (time, open) = history
            .last()
            .map(|c| (c.time + 60, c.close))
            .unwrap_or((0, close));
        history.push(Candle {
            time,
            open,
            high,
            low,
            close,
            volume: 1000.0,
        });
    }

    pub fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "assert_approx failed: actual={actual}, expected={expected}"
        );
    }
}
