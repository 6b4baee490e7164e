// In app/src/panel.rs

//! Terminal rendering of the signal panel.

use events::{SignalReport, TargetKind, format_price, targets, trend_label};
use indicator::Recompute;

/// The multi-line panel: pair header, trend, price and the level ladder.
pub fn render(report: &SignalReport, source: &str) -> String {
    let state = &report.state;
    let mut lines = vec![
        format!("{} {}  [{}]", report.symbol.display_name(), report.interval, source),
        format!(
            "Trend: {:<9} Price: {:<12} ATR: {}",
            trend_label(state),
            format_price(state.price),
            format_price(state.atr)
        ),
    ];

    let levels = targets(state);
    if levels.is_empty() {
        lines.push("  No signal yet.".to_string());
    }
    for target in levels {
        let marker = match target.kind {
            TargetKind::Stop => "x",
            TargetKind::Entry => ">",
            TargetKind::Profit => "+",
        };
        lines.push(format!("  {} {:<10} {}", marker, target.name, format_price(target.value)));
    }

    lines.join("\n")
}

/// A one-line status for refreshes that did not move the levels.
pub fn status_line(report: &SignalReport, outcome: Recompute) -> String {
    let note = match outcome {
        Recompute::Held => "holding".to_string(),
        Recompute::Triggered(cause) => format!("{cause:?}"),
        Recompute::InsufficientData { required, available } => {
            format!("waiting for data ({available}/{required})")
        }
    };
    format!(
        "{} {} {} @ {} ({})",
        report.generated_at.format("%H:%M:%S"),
        report.symbol,
        trend_label(&report.state),
        format_price(report.state.price),
        note
    )
}
