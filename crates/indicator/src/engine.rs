// In crates/indicator/src/engine.rs

use crate::condition::{band, evaluate};
use crate::types::{SignalState, Trend, TrendSettings};
use crate::TARGET_STEPS;
use core_types::Candle;

/// Why a recompute replaced the entry and target levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCause {
    /// The bullish condition turned on at the last candle.
    BullishEdge,
    /// The bearish condition turned on at the last candle.
    BearishEdge,
    /// The caller asked for a recompute and no edge fired.
    Forced,
    /// No signal existed yet and no edge fired.
    Seed,
}

/// What a call to [`SignalEngine::recompute`] did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// Not enough candles; the state was left untouched.
    InsufficientData { required: usize, available: usize },
    /// No trigger; only the last price was refreshed.
    Held,
    /// Levels were recomputed from the last candle.
    Triggered(TriggerCause),
}

/// Edge-triggered signal state for one symbol/timeframe.
///
/// Levels are fixed when a breakout condition turns on and stay put while it
/// holds; every other call only tracks the last price. Each chart context
/// owns its own engine.
#[derive(Debug, Clone, Default)]
pub struct SignalEngine {
    settings: TrendSettings,
    state: SignalState,
}

impl SignalEngine {
    pub fn new(settings: TrendSettings) -> Self {
        Self {
            settings,
            state: SignalState::default(),
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> SignalState {
        self.state
    }

    /// Back to the neutral, no-signal state. Candle history is the caller's.
    pub fn reset(&mut self) {
        self.state = SignalState::default();
    }

    pub fn set_stop_loss_hit(&mut self, hit: bool) {
        self.state.stop_loss_hit = hit;
    }

    /// Re-evaluates the last two candles of `history` and, on a new edge,
    /// a forced call, or when no signal exists yet, fixes new levels from the
    /// last candle.
    pub fn recompute(&mut self, history: &[Candle], force_recalculate: bool) -> Recompute {
        let required = self.settings.min_history();
        if history.len() < required {
            tracing::debug!(
                required,
                available = history.len(),
                "Not enough candles for the indicator; keeping current state."
            );
            return Recompute::InsufficientData {
                required,
                available: history.len(),
            };
        }

        let last_idx = history.len() - 1;
        let prev_idx = last_idx - 1;
        let close = history[last_idx].close;

        let curr = evaluate(history, last_idx, &self.settings);
        let prev = evaluate(history, prev_idx, &self.settings);

        let new_bullish = curr.bullish && !prev.bullish;
        let new_bearish = curr.bearish && !prev.bearish;

        let cause = if new_bullish {
            TriggerCause::BullishEdge
        } else if new_bearish {
            TriggerCause::BearishEdge
        } else if force_recalculate {
            TriggerCause::Forced
        } else if !self.state.has_signal() {
            TriggerCause::Seed
        } else {
            self.state.price = close;
            return Recompute::Held;
        };

        let is_bullish = match cause {
            TriggerCause::BullishEdge => true,
            TriggerCause::BearishEdge => false,
            // No edge: keep the stored direction, which is short after a
            // reset or on a fresh engine.
            TriggerCause::Forced | TriggerCause::Seed => self.state.is_bullish,
        };

        let Some(band) = band(history, last_idx, &self.settings) else {
            tracing::debug!(
                available = history.len(),
                atr_period = self.settings.atr_period,
                "Not enough candles for the volatility estimate; keeping current state."
            );
            return Recompute::InsufficientData {
                required: self.settings.atr_period + 1,
                available: history.len(),
            };
        };

        let atr = band.volatility;
        let [tp1, tp2, tp3] = if is_bullish {
            TARGET_STEPS.map(|step| close + atr * step)
        } else {
            TARGET_STEPS.map(|step| close - atr * step)
        };

        self.state.entry_price = close;
        self.state.stop_loss = if is_bullish { band.lower } else { band.upper };
        self.state.tp1 = tp1;
        self.state.tp2 = tp2;
        self.state.tp3 = tp3;
        self.state.is_bullish = is_bullish;
        self.state.trend = if is_bullish { Trend::Up } else { Trend::Down };
        self.state.has_initial_signal = true;
        self.state.atr = atr;
        self.state.price = close;

        match cause {
            TriggerCause::BullishEdge | TriggerCause::BearishEdge => tracing::info!(
                ?cause,
                entry = close,
                stop_loss = self.state.stop_loss,
                atr,
                "New signal detected."
            ),
            TriggerCause::Forced | TriggerCause::Seed => tracing::debug!(
                ?cause,
                entry = close,
                is_bullish,
                "Signal levels recomputed without an edge."
            ),
        }

        Recompute::Triggered(cause)
    }
}
