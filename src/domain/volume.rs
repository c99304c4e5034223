//! Trailing volume average and spike classification.
//!
//! The trailing average at a given bar covers the `window` bars strictly
//! preceding it; the bar's own volume is never part of its own average.
//! That exclusion is what makes the ratio a "today vs. history" comparison
//! rather than a same-day smoothing.

use crate::domain::bar::PriceBar;
use chrono::NaiveDate;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct VolumePoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub trailing_avg: f64,
}

/// Trailing mean volume per bar, computed with an incremental ring buffer
/// (O(1) per bar). Bars with fewer than `window` predecessors are marked
/// invalid rather than averaged over a short window.
///
/// Returns an empty series for `window == 0` or empty input; otherwise one
/// point per bar, index-aligned with `bars`.
pub fn trailing_volume(bars: &[PriceBar], window: usize) -> Vec<VolumePoint> {
    if window == 0 || bars.is_empty() {
        return Vec::new();
    }

    let mut points = Vec::with_capacity(bars.len());
    let mut recent: VecDeque<i64> = VecDeque::with_capacity(window + 1);
    let mut sum: i64 = 0;

    for bar in bars {
        if recent.len() < window {
            points.push(VolumePoint {
                date: bar.date,
                valid: false,
                trailing_avg: 0.0,
            });
        } else {
            points.push(VolumePoint {
                date: bar.date,
                valid: true,
                trailing_avg: sum as f64 / window as f64,
            });
        }

        sum += bar.volume;
        recent.push_back(bar.volume);
        if recent.len() > window {
            if let Some(oldest) = recent.pop_front() {
                sum -= oldest;
            }
        }
    }

    points
}

/// Volume ratio for a bar against its trailing average, or `None` when the
/// average is undefined, below `floor`, or zero. A zero average is never a
/// spike; it short-circuits before any division.
pub fn spike_ratio(point: &VolumePoint, volume: i64, floor: f64) -> Option<f64> {
    if !point.valid || point.trailing_avg <= 0.0 || point.trailing_avg < floor {
        return None;
    }
    Some(volume as f64 / point.trailing_avg)
}

/// A bar is a volume spike when its trailing average clears the liquidity
/// floor and its ratio meets the threshold.
pub fn is_spike(point: &VolumePoint, volume: i64, floor: f64, ratio_threshold: f64) -> bool {
    spike_ratio(point, volume, floor).is_some_and(|r| r >= ratio_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_bars(volumes: &[i64]) -> Vec<PriceBar> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| PriceBar {
                symbol: "TEST".into(),
                date: base + chrono::Duration::days(i as i64),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.0,
                volume,
            })
            .collect()
    }

    #[test]
    fn warmup_points_invalid() {
        let bars = make_bars(&[100, 200, 300, 400]);
        let points = trailing_volume(&bars, 3);

        assert_eq!(points.len(), 4);
        assert!(!points[0].valid);
        assert!(!points[1].valid);
        assert!(!points[2].valid);
        assert!(points[3].valid);
    }

    #[test]
    fn average_excludes_current_bar() {
        let bars = make_bars(&[100, 200, 300, 4000]);
        let points = trailing_volume(&bars, 3);

        // (100 + 200 + 300) / 3, untouched by the 4000 spike itself
        assert!((points[3].trailing_avg - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn window_slides() {
        let bars = make_bars(&[100, 200, 300, 400, 500]);
        let points = trailing_volume(&bars, 3);

        assert!((points[3].trailing_avg - 200.0).abs() < f64::EPSILON);
        assert!((points[4].trailing_avg - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn window_zero_yields_empty() {
        let bars = make_bars(&[100, 200]);
        assert!(trailing_volume(&bars, 0).is_empty());
    }

    #[test]
    fn empty_bars_yield_empty() {
        assert!(trailing_volume(&[], 3).is_empty());
    }

    #[test]
    fn spike_when_ratio_and_floor_met() {
        let mut volumes = vec![1000i64; 30];
        volumes.push(2000);
        let bars = make_bars(&volumes);
        let points = trailing_volume(&bars, 30);

        let last = points.last().unwrap();
        assert!(last.valid);
        assert!((last.trailing_avg - 1000.0).abs() < f64::EPSILON);
        assert_eq!(spike_ratio(last, 2000, 500.0), Some(2.0));
        assert!(is_spike(last, 2000, 500.0, 1.5));
    }

    #[test]
    fn floor_above_average_blocks_spike() {
        let mut volumes = vec![1000i64; 30];
        volumes.push(2000);
        let bars = make_bars(&volumes);
        let points = trailing_volume(&bars, 30);

        let last = points.last().unwrap();
        assert_eq!(spike_ratio(last, 2000, 1500.0), None);
        assert!(!is_spike(last, 2000, 1500.0, 1.5));
    }

    #[test]
    fn zero_average_never_spikes() {
        let mut volumes = vec![0i64; 30];
        volumes.push(2000);
        let bars = make_bars(&volumes);
        let points = trailing_volume(&bars, 30);

        let last = points.last().unwrap();
        assert!(last.valid);
        assert_eq!(spike_ratio(last, 2000, 0.0), None);
        assert!(!is_spike(last, 2000, 0.0, 1.5));
    }

    #[test]
    fn ratio_exactly_at_threshold_is_a_spike() {
        let mut volumes = vec![1000i64; 30];
        volumes.push(1500);
        let bars = make_bars(&volumes);
        let points = trailing_volume(&bars, 30);

        assert!(is_spike(points.last().unwrap(), 1500, 500.0, 1.5));
    }

    #[test]
    fn invalid_point_never_spikes() {
        let bars = make_bars(&[1000, 9000]);
        let points = trailing_volume(&bars, 30);
        assert!(!is_spike(&points[1], 9000, 0.0, 1.0));
    }

    proptest! {
        /// The incremental accumulator must agree with a direct O(n*w)
        /// recomputation over the strictly-preceding window.
        #[test]
        fn matches_direct_recomputation(
            volumes in proptest::collection::vec(0i64..1_000_000, 0..80),
            window in 1usize..40,
        ) {
            let bars = make_bars(&volumes);
            let points = trailing_volume(&bars, window);

            if bars.is_empty() {
                prop_assert!(points.is_empty());
            } else {
                prop_assert_eq!(points.len(), bars.len());
                for (i, point) in points.iter().enumerate() {
                    if i < window {
                        prop_assert!(!point.valid);
                    } else {
                        let expected: f64 = volumes[i - window..i]
                            .iter()
                            .map(|&v| v as f64)
                            .sum::<f64>() / window as f64;
                        prop_assert!(point.valid);
                        prop_assert!((point.trailing_avg - expected).abs() < 1e-6);
                    }
                }
            }
        }
    }
}
