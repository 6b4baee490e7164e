// In crates/engine/src/lib.rs

pub mod session;

pub use session::{ChartSession, LoadOutcome};

use anyhow::Result;
use indicator::Recompute;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, interval_at};

/// Refreshes `session` every `period` until `shutdown` resolves.
///
/// A failed refresh is logged and the previous signal is kept; the loop only
/// stops on shutdown. `on_update` sees the session after every successful
/// refresh.
pub async fn watch<F>(
    session: &mut ChartSession,
    period: Duration,
    shutdown: impl Future<Output = ()>,
    mut on_update: F,
) -> Result<()>
where
    F: FnMut(&ChartSession, Recompute),
{
    if session.loaded().is_none() {
        anyhow::bail!("Cannot watch before a chart is loaded.");
    }

    tracing::info!(period_secs = period.as_secs_f64(), "Starting refresh loop.");
    let mut ticker = interval_at(Instant::now() + period, period);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, stopping refresh loop.");
                break;
            }
            _ = ticker.tick() => {
                match session.refresh().await {
                    Ok(outcome) => {
                        tracing::debug!(?outcome, "Refreshed chart.");
                        on_update(session, outcome);
                    }
                    Err(e) => tracing::warn!(error = %e, "Refresh failed; keeping previous signal."),
                }
            }
        }
    }

    Ok(())
}
