//! Emitted signal records.

use chrono::NaiveDate;

/// A detected spike + upside event and its forward-window outcome.
/// Created once per qualifying day; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub date: NaiveDate,
    pub entry_price: f64,
    pub volume_ratio: f64,
    pub target_price: f64,
    pub upside_pct: f64,
    pub max_price: f64,
    pub max_gain_pct: f64,
    pub exit_price: f64,
    pub final_return_pct: f64,
    pub days_observed: usize,
}

/// Order a cross-symbol signal collection by date, then symbol, for
/// reporting.
pub fn sort_chronological(signals: &mut [Signal]) {
    signals.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.symbol.cmp(&b.symbol)));
}
