// --- Signal presentation (what the chart, the info panel and the share button read) ---

use chrono::{DateTime, Utc};
use core_types::{Interval, Symbol};
use indicator::SignalState;
use serde::{Deserialize, Serialize};

/// Renders a price with a precision that suits its magnitude.
///
/// Zero and NaN render as `0.0000`.
pub fn format_price(price: f64) -> String {
    if price == 0.0 || price.is_nan() {
        return "0.0000".to_string();
    }
    match price {
        p if p >= 100.0 => format!("{p:.2}"),
        p if p >= 10.0 => format!("{p:.3}"),
        p if p >= 1.0 => format!("{p:.4}"),
        p if p >= 0.1 => format!("{p:.5}"),
        p if p >= 0.001 => format!("{p:.6}"),
        p => format!("{p:.8}"),
    }
}

/// The headline for the trend panel: `STOP HIT` overrides the direction.
pub fn trend_label(state: &SignalState) -> String {
    if state.stop_loss_hit {
        "STOP HIT".to_string()
    } else {
        state.trend.as_str().to_uppercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Stop,
    Entry,
    Profit,
}

/// One labelled price level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub name: &'static str,
    pub value: f64,
    pub kind: TargetKind,
}

/// Stop, entry and the three take-profits, in display order. Levels that are
/// zero or NaN (no signal yet) are left out.
pub fn targets(state: &SignalState) -> Vec<Target> {
    [
        ("STOP LOSS", state.stop_loss, TargetKind::Stop),
        ("ENTRY", state.entry_price, TargetKind::Entry),
        ("TP1", state.tp1, TargetKind::Profit),
        ("TP2", state.tp2, TargetKind::Profit),
        ("TP3", state.tp3, TargetKind::Profit),
    ]
    .into_iter()
    .filter(|(_, value, _)| *value != 0.0 && !value.is_nan())
    .map(|(name, value, kind)| Target { name, value, kind })
    .collect()
}

/// The message handed to the host application when a signal is shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    pub signal: String,
}

/// A signal state tagged with the chart it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SignalReport {
    pub symbol: Symbol,
    pub interval: Interval,
    pub generated_at: DateTime<Utc>,
    pub state: SignalState,
}

impl SignalReport {
    pub fn new(symbol: Symbol, interval: Interval, state: SignalState) -> Self {
        Self {
            symbol,
            interval,
            generated_at: Utc::now(),
            state,
        }
    }

    /// Plain-text signal card.
    pub fn share_text(&self) -> String {
        let state = &self.state;
        let stop_marker = if state.stop_loss_hit { " (STOP HIT)" } else { "" };
        let rule = "═".repeat(24);
        [
            "ANOMAL SIGNAL".to_string(),
            rule.clone(),
            format!("Symbol: {}", self.symbol),
            format!("Timeframe: {}", self.interval),
            format!("Trend: {}{}", state.trend.as_str().to_uppercase(), stop_marker),
            format!("Price: {}", format_price(state.price)),
            format!("Entry: {}", format_price(state.entry_price)),
            format!("Stop Loss: {:.4}", state.stop_loss),
            format!("TP1: {:.4}", state.tp1),
            format!("TP2: {:.4}", state.tp2),
            format!("TP3: {:.4}", state.tp3),
            rule,
            format!("Time: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        ]
        .join("\n")
    }

    pub fn share_payload(&self) -> SharePayload {
        SharePayload {
            signal: self.share_text(),
        }
    }
}
