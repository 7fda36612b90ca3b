//! Index-range requests over a time-indexed sequence.

use serde::{Deserialize, Serialize};

/// A `(start, open_ended)` request over a sequence of time points.
///
/// A negative `start` counts back from the end of the sequence. When
/// `open_ended` is set the selection runs from `start` to the end; otherwise
/// it is the single point at `start`, except that the last point is always
/// treated as open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub start: isize,
    pub open_ended: bool,
}

impl RangeSpec {
    pub fn new(start: isize, open_ended: bool) -> Self {
        Self { start, open_ended }
    }

    /// Exactly one point at `start`.
    pub fn single(start: isize) -> Self {
        Self::new(start, false)
    }

    /// Every point from `start` to the end.
    pub fn through_end(start: isize) -> Self {
        Self::new(start, true)
    }

    /// The final `count` points.
    ///
    /// A range always holds at least one point, so a count of 0 selects the
    /// final point. Counts beyond `isize::MAX` saturate and resolve to the
    /// whole sequence.
    pub fn last(count: usize) -> Self {
        let count = isize::try_from(count.max(1)).unwrap_or(isize::MAX);
        Self::new(-count, true)
    }
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::single(-1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(RangeSpec::single(3), RangeSpec { start: 3, open_ended: false });
        assert_eq!(RangeSpec::through_end(2), RangeSpec { start: 2, open_ended: true });
        assert_eq!(RangeSpec::last(5), RangeSpec { start: -5, open_ended: true });
    }

    #[test]
    fn test_last_edge_counts() {
        assert_eq!(RangeSpec::last(0), RangeSpec::last(1));
        assert_eq!(RangeSpec::last(0), RangeSpec { start: -1, open_ended: true });
        assert_eq!(
            RangeSpec::last(usize::MAX),
            RangeSpec { start: -isize::MAX, open_ended: true }
        );
    }

    #[test]
    fn test_default_is_last_point() {
        assert_eq!(RangeSpec::default(), RangeSpec::single(-1));
    }
}
