// In crates/engine/src/session.rs

use anyhow::{Context, Result};
use api_client::{CandleProvider, SyntheticFeed};
use core_types::{Candle, Interval, Symbol};
use events::SignalReport;
use indicator::{Recompute, SignalEngine, SignalState, TrendSettings};

/// What [`ChartSession::load`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The pair was already loaded; nothing was fetched.
    Unchanged,
    /// New history was installed and the signal recomputed from scratch.
    Loaded {
        /// Name of the provider the candles came from.
        source: &'static str,
        recompute: Recompute,
    },
}

/// One chart: a symbol/timeframe, its candle history and the signal engine
/// that watches it.
pub struct ChartSession {
    provider: Box<dyn CandleProvider>,
    fallback: SyntheticFeed,
    engine: SignalEngine,
    candles: Vec<Candle>,
    loaded: Option<(Symbol, Interval)>,
    /// A fetch returning fewer candles than this counts as failed.
    min_candles: usize,
}

impl ChartSession {
    pub fn new(provider: Box<dyn CandleProvider>, min_candles: usize) -> Self {
        Self {
            provider,
            fallback: SyntheticFeed::new(),
            engine: SignalEngine::new(TrendSettings::default()),
            candles: Vec::new(),
            loaded: None,
            min_candles,
        }
    }

    /// Replaces the offline generator used when the provider fails.
    pub fn with_fallback(mut self, fallback: SyntheticFeed) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn state(&self) -> SignalState {
        self.engine.state()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn loaded(&self) -> Option<(&Symbol, Interval)> {
        self.loaded.as_ref().map(|(s, i)| (s, *i))
    }

    /// The current state tagged with the loaded pair.
    pub fn report(&self) -> Option<SignalReport> {
        self.loaded
            .as_ref()
            .map(|(symbol, interval)| SignalReport::new(symbol.clone(), *interval, self.state()))
    }

    /// Switches the chart to `symbol`/`interval`.
    ///
    /// Loading the pair that is already shown is a no-op. A failed or too
    /// short fetch falls back to synthetic candles, so a chart always ends up
    /// loaded. The signal is reset and forcibly recomputed for the new history.
    pub async fn load(&mut self, symbol: &Symbol, interval: Interval) -> LoadOutcome {
        let already_loaded = self
            .loaded
            .as_ref()
            .is_some_and(|(s, i)| s == symbol && *i == interval);
        if already_loaded && !self.candles.is_empty() {
            tracing::debug!(symbol = %symbol, %interval, "Already loaded, skipping.");
            return LoadOutcome::Unchanged;
        }

        tracing::info!(symbol = %symbol, %interval, provider = self.provider.name(), "Loading chart.");
        let (candles, source) = match self.provider.fetch(symbol, interval).await {
            Ok(candles) if candles.len() >= self.min_candles => (candles, self.provider.name()),
            Ok(candles) => {
                tracing::warn!(
                    symbol = %symbol,
                    received = candles.len(),
                    required = self.min_candles,
                    "Not enough data; loading synthetic candles."
                );
                (self.fallback.generate(symbol, interval), self.fallback_name())
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Error loading data; loading synthetic candles.");
                (self.fallback.generate(symbol, interval), self.fallback_name())
            }
        };

        self.candles = candles;
        self.loaded = Some((symbol.clone(), interval));
        self.engine.reset();
        let recompute = self.recompute(true);

        LoadOutcome::Loaded { source, recompute }
    }

    /// Re-fetches the loaded pair and runs the edge-triggered update.
    ///
    /// On failure the previous history and signal are kept.
    pub async fn refresh(&mut self) -> Result<Recompute> {
        let (symbol, interval) = self
            .loaded
            .clone()
            .context("No chart loaded; nothing to refresh")?;

        let candles = self
            .provider
            .fetch(&symbol, interval)
            .await
            .with_context(|| format!("Failed to refresh {} {}", symbol, interval))?;
        if candles.len() < self.min_candles {
            anyhow::bail!(
                "Refresh of {} {} returned {} candles, need {}",
                symbol,
                interval,
                candles.len(),
                self.min_candles
            );
        }

        self.candles = candles;
        Ok(self.recompute(false))
    }

    /// Drops the current signal and, when history is present, reseeds it.
    pub fn reset(&mut self) -> Option<Recompute> {
        tracing::info!("Resetting indicator.");
        self.engine.reset();
        if self.candles.is_empty() {
            return None;
        }
        Some(self.recompute(true))
    }

    fn recompute(&mut self, force: bool) -> Recompute {
        let outcome = self.engine.recompute(&self.candles, force);
        self.monitor_stop(outcome);
        outcome
    }

    /// Latches `stop_loss_hit` once the last price reaches the stop. Fresh
    /// levels start with the flag cleared.
    fn monitor_stop(&mut self, outcome: Recompute) {
        if let Recompute::Triggered(_) = outcome {
            self.engine.set_stop_loss_hit(false);
        }

        let state = self.engine.state();
        if !state.stop_loss_hit && state.stop_breached(state.price) {
            tracing::warn!(
                price = state.price,
                stop_loss = state.stop_loss,
                is_bullish = state.is_bullish,
                "Stop-loss hit."
            );
            self.engine.set_stop_loss_hit(true);
        }
    }

    fn fallback_name(&self) -> &'static str {
        CandleProvider::name(&self.fallback)
    }
}
