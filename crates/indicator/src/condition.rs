// In crates/indicator/src/condition.rs

//! Stateless breakout evaluation.
//!
//! Everything here is a pure function of the candle history up to and
//! including `index`; nothing after `index` is ever read.

use crate::types::{Band, Condition, TrendSettings};
use crate::VOLATILITY_DAMPING;
use core_types::Candle;

/// True range of `candle` given the previous bar's close.
pub fn true_range(prev_close: f64, candle: &Candle) -> f64 {
    let hl = candle.high - candle.low;
    let hc = (candle.high - prev_close).abs();
    let lc = (candle.low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Damped average true range over the `atr_period` bars ending at `index`.
///
/// Needs `atr_period + 1` candles up to `index` (each true range reads the
/// previous close). Returns `None` when they are not available.
pub fn volatility(history: &[Candle], index: usize, atr_period: usize) -> Option<f64> {
    if atr_period == 0 || index >= history.len() || index < atr_period {
        return None;
    }

    let first = index + 1 - atr_period;
    let sum: f64 = (first..=index)
        .map(|i| true_range(history[i - 1].close, &history[i]))
        .sum();

    Some(sum / atr_period as f64 * VOLATILITY_DAMPING)
}

/// The band at `index`: SMA of highs and lows over the last `trend_length`
/// candles, pushed outward by the volatility estimate.
pub fn band(history: &[Candle], index: usize, settings: &TrendSettings) -> Option<Band> {
    let volatility = volatility(history, index, settings.atr_period)?;

    let count = settings.trend_length.clamp(1, index + 1);
    let window = &history[index + 1 - count..=index];
    let (sum_high, sum_low) = window
        .iter()
        .fold((0.0, 0.0), |(h, l), c| (h + c.high, l + c.low));

    Some(Band {
        upper: sum_high / count as f64 + volatility,
        lower: sum_low / count as f64 - volatility,
        volatility,
    })
}

/// Whether the close at `index` broke above or below the band.
///
/// Indices before `trend_length`, or past the end of `history`, have no
/// condition and evaluate to neutral.
pub fn evaluate(history: &[Candle], index: usize, settings: &TrendSettings) -> Condition {
    if index < settings.trend_length || index >= history.len() {
        return Condition::default();
    }

    let Some(band) = band(history, index, settings) else {
        return Condition::default();
    };

    let close = history[index].close;
    Condition {
        bullish: close > band.upper,
        bearish: close < band.lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_approx, flat_history, push};

    #[test]
    fn true_range_takes_gap_into_account() {
        let mut history = flat_history(1, 100.0);
        push(&mut history, 115.0, 108.0, 112.0);
        // max(7, |115-100|, |108-100|) = 15
        assert_approx(true_range(history[0].close, &history[1]), 15.0);
    }

    #[test]
    fn volatility_needs_a_previous_close_per_bar() {
        let history = flat_history(20, 100.0);
        assert_eq!(volatility(&history, 13, 14), None);
        assert_eq!(volatility(&history, 14, 14), Some(0.0));
        assert_eq!(volatility(&history, 20, 14), None);
    }

    #[test]
    fn volatility_averages_the_most_recent_window() {
        let mut history = flat_history(5, 100.0);
        // An early spike that falls outside the last 14 bars.
        push(&mut history, 150.0, 50.0, 100.0);
        for _ in 0..20 {
            push(&mut history, 102.0, 98.0, 100.0);
        }
        let last = history.len() - 1;
        // 14 bars of TR 4, damped by 0.3.
        assert_approx(volatility(&history, last, 14).unwrap(), 4.0 * 0.3);
    }

    #[test]
    fn band_is_sma_widened_by_volatility() {
        let mut history = flat_history(40, 100.0);
        push(&mut history, 121.0, 119.0, 120.0);
        let settings = TrendSettings::default();
        let band = band(&history, 40, &settings).unwrap();

        // Only the last TR (21) is non-zero: 21 / 14 * 0.3.
        assert_approx(band.volatility, 0.45);
        assert_approx(band.upper, (33.0 * 100.0 + 121.0) / 34.0 + 0.45);
        assert_approx(band.lower, (33.0 * 100.0 + 119.0) / 34.0 - 0.45);
    }

    #[test]
    fn short_index_is_neutral() {
        let mut history = flat_history(33, 100.0);
        push(&mut history, 200.0, 199.0, 200.0);
        let settings = TrendSettings::default();
        assert_eq!(evaluate(&history, 33, &settings), Condition::default());
        assert_eq!(evaluate(&history, 99, &settings), Condition::default());
    }

    #[test]
    fn flat_history_is_neutral() {
        let history = flat_history(50, 100.0);
        let condition = evaluate(&history, 49, &TrendSettings::default());
        assert!(!condition.bullish);
        assert!(!condition.bearish);
    }

    #[test]
    fn breakout_above_band_is_bullish() {
        let mut history = flat_history(40, 100.0);
        push(&mut history, 121.0, 119.0, 120.0);
        let settings = TrendSettings::default();
        assert_eq!(
            evaluate(&history, 40, &settings),
            Condition { bullish: true, bearish: false }
        );
        assert_eq!(evaluate(&history, 39, &settings), Condition::default());
    }

    #[test]
    fn breakdown_below_band_is_bearish() {
        let mut history = flat_history(40, 100.0);
        push(&mut history, 81.0, 79.0, 80.0);
        let condition = evaluate(&history, 40, &TrendSettings::default());
        assert!(condition.bearish);
        assert!(!condition.bullish);
    }

    #[test]
    fn evaluation_ignores_later_candles() {
        let mut history = flat_history(40, 100.0);
        push(&mut history, 121.0, 119.0, 120.0);
        let settings = TrendSettings::default();
        let truncated = evaluate(&history, 40, &settings);

        push(&mut history, 60.0, 40.0, 50.0);
        assert_eq!(evaluate(&history, 40, &settings), truncated);
    }
}
