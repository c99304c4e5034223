//! Analyst price-target observations and point-in-time lookup.
//!
//! Lookups are "as of" a reference date: the latest observation published
//! on-or-before that date wins, and an observation published after the
//! reference date must never leak into the result.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct TargetObservation {
    /// Publication day, normalized to a timezone-free calendar date.
    pub published: NaiveDate,
    pub price_target: f64,
}

/// Latest target published on-or-before `as_of`, or `None` when every
/// observation is later than the reference date.
///
/// `targets` must be sorted ascending by published date. When several
/// observations share a date, the last one in the sequence wins.
pub fn target_as_of(targets: &[TargetObservation], as_of: NaiveDate) -> Option<f64> {
    let idx = targets.partition_point(|t| t.published <= as_of);
    if idx == 0 {
        None
    } else {
        Some(targets[idx - 1].price_target)
    }
}

/// Forward-only cursor over a sorted target series.
///
/// A backtest pass visits bar dates in increasing order, so the cursor
/// never rewinds; a whole pass costs O(bars + targets) instead of a binary
/// search per qualifying day.
#[derive(Debug)]
pub struct TargetCursor<'a> {
    targets: &'a [TargetObservation],
    next: usize,
}

impl<'a> TargetCursor<'a> {
    pub fn new(targets: &'a [TargetObservation]) -> Self {
        Self { targets, next: 0 }
    }

    /// Latest target published on-or-before `as_of`.
    ///
    /// Successive calls must pass non-decreasing dates.
    pub fn advance_to(&mut self, as_of: NaiveDate) -> Option<f64> {
        while self.next < self.targets.len() && self.targets[self.next].published <= as_of {
            self.next += 1;
        }
        if self.next == 0 {
            None
        } else {
            Some(self.targets[self.next - 1].price_target)
        }
    }
}
