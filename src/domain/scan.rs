//! Scan configuration and the per-symbol signal backtest.
//!
//! The backtest is pure computation over in-memory slices. Each symbol is
//! independent of every other, so callers may fan symbols out across
//! threads and concatenate the results without coordination.

use crate::domain::bar::PriceBar;
use crate::domain::error::ScanError;
use crate::domain::normalize::{normalize_bars, normalize_targets};
use crate::domain::outcome;
use crate::domain::signal::Signal;
use crate::domain::target::{TargetCursor, TargetObservation};
use crate::domain::volume::{spike_ratio, trailing_volume};

/// Threshold set for one run. Passed explicitly into the backtest so
/// parameterized runs stay independent of each other.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Trailing volume window length, in bars.
    pub volume_window: usize,
    /// Minimum volume / trailing-average ratio for a spike.
    pub spike_ratio: f64,
    /// Minimum trailing average volume (liquidity floor).
    pub min_avg_volume: f64,
    /// Minimum analyst upside, in percent.
    pub upside_threshold: f64,
    /// Forward window length for outcome simulation, in bars.
    pub holding_period: usize,
    /// Max-gain percentage a signal must strictly exceed to count as a win.
    pub win_threshold: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            volume_window: 30,
            spike_ratio: 1.5,
            min_avg_volume: 50_000.0,
            upside_threshold: 20.0,
            holding_period: 15,
            win_threshold: 5.0,
        }
    }
}

impl ScanConfig {
    /// Fewest bars a symbol can have and still emit a signal: a full
    /// trailing window, the signal day, and one forward day.
    pub fn min_usable_bars(&self) -> usize {
        self.volume_window + 2
    }
}

/// Run the spike + upside backtest for one symbol.
///
/// Bars and targets may arrive unordered; both are normalized first. A
/// symbol with no bars, or no target coverage, yields an empty signal
/// list. Candidate days are dropped silently when the trailing window is
/// short, the liquidity floor or ratio threshold is missed, no target has
/// been published yet, the upside is too small, or no forward bar exists
/// to score the outcome against.
pub fn backtest_symbol(
    symbol: &str,
    bars: Vec<PriceBar>,
    targets: Vec<TargetObservation>,
    config: &ScanConfig,
) -> Result<Vec<Signal>, ScanError> {
    let bars = normalize_bars(bars)?;
    let targets = normalize_targets(symbol, targets)?;

    let stats = trailing_volume(&bars, config.volume_window);
    let mut cursor = TargetCursor::new(&targets);
    let mut signals = Vec::new();

    for (idx, (bar, stat)) in bars.iter().zip(stats.iter()).enumerate() {
        let Some(ratio) = spike_ratio(stat, bar.volume, config.min_avg_volume) else {
            continue;
        };
        if ratio < config.spike_ratio {
            continue;
        }

        let Some(target) = cursor.advance_to(bar.date) else {
            continue;
        };
        let upside = (target - bar.close) / bar.close * 100.0;
        if upside < config.upside_threshold {
            continue;
        }

        let Some(outcome) = outcome::simulate(&bars, idx, bar.close, config.holding_period) else {
            // outcome not yet determinable
            continue;
        };

        signals.push(Signal {
            symbol: symbol.to_string(),
            date: bar.date,
            entry_price: bar.close,
            volume_ratio: ratio,
            target_price: target,
            upside_pct: upside,
            max_price: outcome.max_price,
            max_gain_pct: outcome.max_gain_pct,
            exit_price: outcome.exit_price,
            final_return_pct: outcome.final_return_pct,
            days_observed: outcome.days_observed,
        });
    }

    Ok(signals)
}
