//! Bookkeeping of which stream offsets have already been written
use std::ops::Range;

/// A disjoint, sorted set of half-open offset ranges.
///
/// Two rules govern the set and they deliberately disagree about touching
/// ranges:
///
/// - [`overlaps`](Self::overlaps) only reports a non-empty intersection, so
///   `[0, 5)` and `[5, 10)` do not overlap.
/// - [`add`](Self::add) coalesces anything overlapping *or* adjacent, so
///   adding `[5, 10)` next to `[0, 5)` leaves a single `[0, 10)`.
///
/// After every `add` no two stored ranges overlap or touch.
///
/// # Examples
///
/// ```
/// use retrosniff::tcp::WrittenRanges;
///
/// let mut written = WrittenRanges::new();
/// written.add(0, 5);
/// assert!(!written.overlaps(5, 10));
///
/// written.add(5, 10);
/// assert_eq!(written.ranges(), &[0..10]);
/// assert!(written.overlaps(9, 12));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenRanges {
    ranges: Vec<Range<i64>>,
}

impl WrittenRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff some stored range shares at least one offset with `[a, b)`.
    pub fn overlaps(&self, a: i64, b: i64) -> bool {
        if b <= a {
            return false;
        }
        // first range that ends after `a`; ends are sorted because ranges are disjoint
        let idx = self.ranges.partition_point(|r| r.end <= a);
        self.ranges.get(idx).is_some_and(|r| r.start < b)
    }

    /// Insert `[a, b)`, merging every range it overlaps or touches.
    pub fn add(&mut self, a: i64, b: i64) {
        if b <= a {
            return;
        }
        let lo = self.ranges.partition_point(|r| r.end < a);
        let hi = self.ranges.partition_point(|r| r.start <= b);

        if lo == hi {
            self.ranges.insert(lo, a..b);
            return;
        }

        let start = a.min(self.ranges[lo].start);
        let end = b.max(self.ranges[hi - 1].end);
        self.ranges.splice(lo..hi, std::iter::once(start..end));
    }

    pub fn ranges(&self) -> &[Range<i64>] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of distinct offsets covered
    pub fn covered(&self) -> u64 {
        self.ranges.iter().map(|r| (r.end - r.start) as u64).sum()
    }
}
