//! Aggregate statistics over emitted signals.

use crate::domain::signal::Signal;

/// Cross-symbol performance summary. Derived statistics are `None` for an
/// empty collection; a NaN must never leak to a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub avg_max_gain: Option<f64>,
    pub avg_final_return: Option<f64>,
    /// Percentage of signals whose max gain strictly exceeded the win
    /// threshold.
    pub win_rate: Option<f64>,
}

impl Summary {
    pub fn compute(signals: &[Signal], win_threshold: f64) -> Self {
        if signals.is_empty() {
            return Self {
                count: 0,
                avg_max_gain: None,
                avg_final_return: None,
                win_rate: None,
            };
        }

        let n = signals.len() as f64;
        let avg_max_gain = signals.iter().map(|s| s.max_gain_pct).sum::<f64>() / n;
        let avg_final_return = signals.iter().map(|s| s.final_return_pct).sum::<f64>() / n;
        let wins = signals
            .iter()
            .filter(|s| s.max_gain_pct > win_threshold)
            .count();

        Self {
            count: signals.len(),
            avg_max_gain: Some(avg_max_gain),
            avg_final_return: Some(avg_final_return),
            win_rate: Some(wins as f64 / n * 100.0),
        }
    }
}
