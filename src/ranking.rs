//! # Priority Ranker
//! Pure, testable logic that turns an unordered report feed into the bounded
//! "critical zones" view. No I/O and no shared mutable state: re-ranking the
//! same snapshot twice yields identical output, and concurrent invocations
//! with different snapshots never interfere.
//!
//! The listing endpoint gives no ordering guarantee; this module imposes its
//! own. Scores come from upstream and are never recomputed here.

use crate::report::Report;

/// Reports strictly above this score count as critical zones.
pub const DEFAULT_PRIORITY_THRESHOLD: i32 = 60;

/// How many zones one window shows.
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Filter to `priority_score > threshold`, sorted non-increasing by score.
/// The sort is stable: equal scores keep their original feed order.
pub fn critical_zones(reports: &[Report], threshold: i32) -> Vec<&Report> {
    let mut zones: Vec<&Report> = reports
        .iter()
        .filter(|r| r.priority_score > threshold)
        .collect();
    zones.sort_by_key(|r| std::cmp::Reverse(r.priority_score));
    zones
}

/// Ordered ids of the critical zones for a snapshot.
pub fn ranked_ids(reports: &[Report], threshold: i32) -> Vec<i64> {
    critical_zones(reports, threshold)
        .into_iter()
        .map(|r| r.id)
        .collect()
}

/// Clamp a window start into the valid aligned range for a list of `len`
/// items: the largest window-aligned index that still shows something, or 0
/// for an empty list. A zero `window_size` is treated as 1.
pub fn clamp_start(len: usize, window_size: usize, start: usize) -> usize {
    let window_size = window_size.max(1);
    if len == 0 {
        return 0;
    }
    start.min(((len - 1) / window_size) * window_size)
}

/// Fixed-size navigable window over the ranked id list.
///
/// Recomputed from a fresh snapshot on every refresh via [`resnapshot`];
/// only the start index survives, re-clamped into the new list's range.
///
/// [`resnapshot`]: RankedWindow::resnapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedWindow {
    ordered_ids: Vec<i64>,
    start: usize,
    window_size: usize,
}

impl RankedWindow {
    pub fn from_snapshot(reports: &[Report], threshold: i32, window_size: usize) -> Self {
        Self {
            ordered_ids: ranked_ids(reports, threshold),
            start: 0,
            window_size: window_size.max(1),
        }
    }

    /// Rebuild the ordered list from a new snapshot. Does not look at the
    /// previous window's content; the existing start index is only re-clamped.
    pub fn resnapshot(&mut self, reports: &[Report], threshold: i32) {
        self.ordered_ids = ranked_ids(reports, threshold);
        self.start = clamp_start(self.ordered_ids.len(), self.window_size, self.start);
    }

    /// Ids currently in view. An empty slice is a valid state, not an error.
    pub fn visible(&self) -> &[i64] {
        let len = self.ordered_ids.len();
        let lo = self.start.min(len);
        let hi = (self.start + self.window_size).min(len);
        &self.ordered_ids[lo..hi]
    }

    /// Advance by one window if a full or partial next window exists.
    /// Returns whether the start moved; no wraparound.
    pub fn next(&mut self) -> bool {
        if self.start + self.window_size < self.ordered_ids.len() {
            self.start += self.window_size;
            true
        } else {
            false
        }
    }

    /// Retreat by one window if the result stays at or above zero.
    pub fn prev(&mut self) -> bool {
        if self.start >= self.window_size {
            self.start -= self.window_size;
            true
        } else {
            false
        }
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn ordered_ids(&self) -> &[i64] {
        &self.ordered_ids
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_ids.is_empty()
    }
}
