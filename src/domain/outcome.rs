//! Forward holding-window outcome simulation.

use crate::domain::bar::PriceBar;

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub max_price: f64,
    pub max_gain_pct: f64,
    pub exit_price: f64,
    pub final_return_pct: f64,
    pub days_observed: usize,
}

/// Outcome over the first `holding_period` bars strictly after
/// `signal_idx`. A shorter tail uses whatever bars exist and records the
/// truncated count. Returns `None` when no forward bar exists at all; the
/// caller must discard the candidate rather than emit a partial record.
pub fn simulate(
    bars: &[PriceBar],
    signal_idx: usize,
    entry_price: f64,
    holding_period: usize,
) -> Option<Outcome> {
    let start = signal_idx + 1;
    if start >= bars.len() {
        return None;
    }
    let end = bars.len().min(start + holding_period);
    let window = &bars[start..end];
    let last = window.last()?;

    let max_price = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    Some(Outcome {
        max_price,
        max_gain_pct: (max_price - entry_price) / entry_price * 100.0,
        exit_price: last.close,
        final_return_pct: (last.close - entry_price) / entry_price * 100.0,
        days_observed: window.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(highs_closes: &[(f64, f64)]) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        highs_closes
            .iter()
            .enumerate()
            .map(|(i, &(high, close))| PriceBar {
                symbol: "TEST".into(),
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high,
                low: close.min(high),
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn max_gain_and_final_return() {
        // entry bar then forward highs [105, 98, 112, 101], final close 101
        let bars = make_bars(&[
            (100.0, 100.0),
            (105.0, 104.0),
            (98.0, 97.0),
            (112.0, 110.0),
            (101.0, 101.0),
        ]);
        let outcome = simulate(&bars, 0, 100.0, 15).unwrap();

        assert!((outcome.max_price - 112.0).abs() < f64::EPSILON);
        assert!((outcome.max_gain_pct - 12.0).abs() < 1e-9);
        assert!((outcome.exit_price - 101.0).abs() < f64::EPSILON);
        assert!((outcome.final_return_pct - 1.0).abs() < 1e-9);
        assert_eq!(outcome.days_observed, 4);
    }

    #[test]
    fn window_capped_at_holding_period() {
        let bars = make_bars(&[
            (100.0, 100.0),
            (101.0, 101.0),
            (102.0, 102.0),
            (150.0, 150.0),
        ]);
        let outcome = simulate(&bars, 0, 100.0, 2).unwrap();

        assert_eq!(outcome.days_observed, 2);
        assert!((outcome.max_price - 102.0).abs() < f64::EPSILON);
        assert!((outcome.exit_price - 102.0).abs() < f64::EPSILON);
    }

    #[test]
    fn second_to_last_bar_observes_one_day() {
        let bars = make_bars(&[(100.0, 100.0), (104.0, 103.0)]);
        let outcome = simulate(&bars, 0, 100.0, 15).unwrap();

        assert_eq!(outcome.days_observed, 1);
        assert!((outcome.max_price - 104.0).abs() < f64::EPSILON);
        assert!((outcome.exit_price - 103.0).abs() < f64::EPSILON);
    }

    #[test]
    fn last_bar_has_no_outcome() {
        let bars = make_bars(&[(100.0, 100.0), (104.0, 103.0)]);
        assert!(simulate(&bars, 1, 103.0, 15).is_none());
    }

    #[test]
    fn negative_final_return() {
        let bars = make_bars(&[(100.0, 100.0), (99.0, 90.0)]);
        let outcome = simulate(&bars, 0, 100.0, 15).unwrap();

        assert!((outcome.final_return_pct - (-10.0)).abs() < 1e-9);
        assert!((outcome.max_gain_pct - (-1.0)).abs() < 1e-9);
    }
}
