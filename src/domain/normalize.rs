//! Input normalization: sort, de-duplicate, validate.
//!
//! Upstream feeds deliver bars and target observations in whatever order
//! the API returned them, sometimes with repeated dates. Normalization
//! produces the sorted series the rest of the domain assumes: bar dates
//! strictly increasing (last occurrence wins on a repeat), target dates
//! non-decreasing with same-day observations kept in input order.
//! Missing days are left missing.

use crate::domain::bar::PriceBar;
use crate::domain::error::ScanError;
use crate::domain::target::TargetObservation;

/// Sort bars ascending by date and collapse repeated dates to the last
/// occurrence in input order. Malformed records are rejected: negative
/// volume, or a price that is not a positive finite number.
///
/// An empty input is valid and yields an empty series.
pub fn normalize_bars(bars: Vec<PriceBar>) -> Result<Vec<PriceBar>, ScanError> {
    for bar in &bars {
        if bar.volume < 0 {
            return Err(ScanError::Data {
                symbol: bar.symbol.clone(),
                reason: format!("negative volume {} on {}", bar.volume, bar.date),
            });
        }
        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScanError::Data {
                    symbol: bar.symbol.clone(),
                    reason: format!("non-positive {} {} on {}", name, value, bar.date),
                });
            }
        }
    }

    let mut bars = bars;
    bars.sort_by_key(|b| b.date);

    // Stable sort keeps input order within a date; the merge keeps the last.
    let mut out: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match out.last_mut() {
            Some(prev) if prev.date == bar.date => *prev = bar,
            _ => out.push(bar),
        }
    }
    Ok(out)
}

/// Sort target observations ascending by published date. Same-day
/// observations are all retained, in input order, so an as-of lookup
/// resolves to the last of them. Rejects targets that are not positive
/// finite numbers.
pub fn normalize_targets(
    symbol: &str,
    mut targets: Vec<TargetObservation>,
) -> Result<Vec<TargetObservation>, ScanError> {
    for t in &targets {
        if !t.price_target.is_finite() || t.price_target <= 0.0 {
            return Err(ScanError::Data {
                symbol: symbol.to_string(),
                reason: format!("non-positive price target {} on {}", t.price_target, t.published),
            });
        }
    }
    targets.sort_by_key(|t| t.published);
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(date: &str, close: f64, volume: i64) -> PriceBar {
        PriceBar {
            symbol: "TEST".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }

    fn obs(date: &str, target: f64) -> TargetObservation {
        TargetObservation {
            published: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            price_target: target,
        }
    }

    #[test]
    fn bars_sorted_ascending() {
        let input = vec![
            bar("2024-01-03", 3.0, 100),
            bar("2024-01-01", 1.0, 100),
            bar("2024-01-02", 2.0, 100),
        ];
        let out = normalize_bars(input).unwrap();
        let dates: Vec<_> = out.iter().map(|b| b.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn duplicate_dates_collapse_to_last_occurrence() {
        let input = vec![
            bar("2024-01-01", 1.0, 100),
            bar("2024-01-02", 2.0, 100),
            bar("2024-01-01", 9.0, 900),
        ];
        let out = normalize_bars(input).unwrap();
        assert_eq!(out.len(), 2);
        assert!((out[0].close - 9.0).abs() < f64::EPSILON);
        assert_eq!(out[0].volume, 900);
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = vec![
            bar("2024-01-02", 2.0, 200),
            bar("2024-01-01", 1.0, 100),
            bar("2024-01-02", 5.0, 500),
        ];
        let once = normalize_bars(input).unwrap();
        let twice = normalize_bars(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_bars_are_valid() {
        assert!(normalize_bars(vec![]).unwrap().is_empty());
    }

    #[test]
    fn negative_volume_rejected() {
        let err = normalize_bars(vec![bar("2024-01-01", 1.0, -5)]).unwrap_err();
        assert!(matches!(err, ScanError::Data { symbol, .. } if symbol == "TEST"));
    }

    #[test]
    fn non_finite_price_rejected() {
        let mut b = bar("2024-01-01", 1.0, 100);
        b.high = f64::NAN;
        assert!(normalize_bars(vec![b]).is_err());

        let mut b = bar("2024-01-01", 1.0, 100);
        b.close = 0.0;
        assert!(normalize_bars(vec![b]).is_err());
    }

    #[test]
    fn targets_sorted_same_day_order_preserved() {
        let input = vec![
            obs("2024-01-10", 60.0),
            obs("2024-01-05", 40.0),
            obs("2024-01-05", 45.0),
        ];
        let out = normalize_targets("TEST", input).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out[0].price_target - 40.0).abs() < f64::EPSILON);
        assert!((out[1].price_target - 45.0).abs() < f64::EPSILON);
        assert!((out[2].price_target - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_positive_target_rejected() {
        let err = normalize_targets("TEST", vec![obs("2024-01-01", 0.0)]).unwrap_err();
        assert!(matches!(err, ScanError::Data { .. }));
    }

    #[test]
    fn empty_targets_are_valid() {
        assert!(normalize_targets("TEST", vec![]).unwrap().is_empty());
    }
}
