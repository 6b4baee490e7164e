//! Property tests for the signal engine.
//!
//! Uses proptest to verify:
//! 1. Short histories never touch the state
//! 2. Levels fixed on an edge are strictly ordered in the signal's direction
//! 3. Recomputing the same history twice changes nothing
//! 4. Reset always lands on the neutral state

use core_types::Candle;
use indicator::{Recompute, SignalEngine, SignalState, Trend, TriggerCause};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// One bar of a random walk: (close move, upper wick, lower wick).
fn arb_step() -> impl Strategy<Value = (f64, f64, f64)> {
    (-6.0..6.0_f64, 0.05..3.0_f64, 0.05..3.0_f64)
}

/// Candle history built from a random walk starting at 1000.
/// Every candle has `high > low`, so every true range is positive.
fn arb_history(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec(arb_step(), len).prop_map(|steps| {
        let mut prev_close = 1000.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (change, upper_wick, lower_wick))| {
                let open = prev_close;
                let close = open + change;
                prev_close = close;
                Candle {
                    time: i as i64 * 60,
                    open,
                    high: open.max(close) + upper_wick,
                    low: open.min(close) - lower_wick,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    })
}

fn assert_ladder(state: &SignalState) -> Result<(), TestCaseError> {
    if state.is_bullish {
        prop_assert!(state.stop_loss < state.entry_price);
        prop_assert!(state.entry_price < state.tp1);
        prop_assert!(state.tp1 < state.tp2);
        prop_assert!(state.tp2 < state.tp3);
        prop_assert_eq!(state.trend, Trend::Up);
    } else {
        prop_assert!(state.stop_loss > state.entry_price);
        prop_assert!(state.entry_price > state.tp1);
        prop_assert!(state.tp1 > state.tp2);
        prop_assert!(state.tp2 > state.tp3);
        prop_assert_eq!(state.trend, Trend::Down);
    }
    Ok(())
}

// ── 1. Short histories ───────────────────────────────────────────────

proptest! {
    /// Fewer than 35 candles never changes the state, whatever came before.
    #[test]
    fn short_history_leaves_state_unchanged(
        seed in arb_history(40..60),
        short in arb_history(0..35),
        force in any::<bool>(),
    ) {
        let mut engine = SignalEngine::default();
        engine.recompute(&seed, false);
        let before = engine.state();

        let outcome = engine.recompute(&short, force);
        let is_insufficient = matches!(outcome, Recompute::InsufficientData { .. });
        prop_assert!(is_insufficient);
        prop_assert_eq!(engine.state(), before);
    }
}

// ── 2. Target ladder ordering ────────────────────────────────────────

proptest! {
    /// Streaming a history candle by candle, every edge-triggered signal
    /// has its stop behind the entry and its targets strictly ahead of it.
    #[test]
    fn edge_levels_are_strictly_ordered(history in arb_history(35..160)) {
        let mut engine = SignalEngine::default();
        for end in 35..=history.len() {
            let outcome = engine.recompute(&history[..end], false);
            if let Recompute::Triggered(TriggerCause::BullishEdge | TriggerCause::BearishEdge) = outcome {
                let state = engine.state();
                prop_assert_eq!(state.entry_price, history[end - 1].close);
                assert_ladder(&state)?;
            }
        }
    }

    /// Levels between edges never move; only the tracked price does.
    #[test]
    fn levels_only_move_on_triggers(history in arb_history(36..120)) {
        let mut engine = SignalEngine::default();
        engine.recompute(&history[..35], false);
        for end in 36..=history.len() {
            let before = engine.state();
            if engine.recompute(&history[..end], false) == Recompute::Held {
                let after = engine.state();
                prop_assert_eq!(after.entry_price, before.entry_price);
                prop_assert_eq!(after.stop_loss, before.stop_loss);
                prop_assert_eq!(after.targets(), before.targets());
                prop_assert_eq!(after.is_bullish, before.is_bullish);
                prop_assert_eq!(after.price, history[end - 1].close);
            }
        }
    }
}

// ── 3. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn recompute_twice_is_stable(history in arb_history(35..120)) {
        let mut engine = SignalEngine::default();
        engine.recompute(&history, false);
        let first = engine.state();
        engine.recompute(&history, false);
        prop_assert_eq!(engine.state(), first);
    }

    /// A forced recompute without an edge never flips the direction.
    #[test]
    fn forced_recompute_preserves_direction(history in arb_history(36..120)) {
        let mut engine = SignalEngine::default();
        engine.recompute(&history[..history.len() - 1], false);
        let before = engine.state();

        if engine.recompute(&history, true) == Recompute::Triggered(TriggerCause::Forced) {
            prop_assert_eq!(engine.state().is_bullish, before.is_bullish);
            prop_assert_eq!(engine.state().entry_price, history[history.len() - 1].close);
        }
    }
}

// ── 4. Reset ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reset_is_neutral(history in arb_history(35..80), hit in any::<bool>()) {
        let mut engine = SignalEngine::default();
        engine.recompute(&history, true);
        engine.set_stop_loss_hit(hit);
        engine.reset();

        let state = engine.state();
        prop_assert_eq!(state, SignalState::default());
        prop_assert_eq!(state.entry_price, 0.0);
        prop_assert_eq!(state.trend, Trend::Neutral);
        prop_assert!(!state.has_initial_signal);
    }
}
