//! Range selection over time-indexed sequences.

use outlier_spi::{OutlierError, RangeSpec, Result};
use std::ops::Range;

/// Resolve a [`RangeSpec`] against a sequence of length `len`.
///
/// A negative start counts back from the end. An open-ended request whose
/// start lies before the beginning is clamped to 0; any other resolution
/// outside `[0, len)` is an error. The last index always selects through the
/// end, so `start = -1` with or without `open_ended` is the same range.
pub fn resolve(len: usize, spec: RangeSpec) -> Result<Range<usize>> {
    let out_of_range = OutlierError::IndexOutOfRange {
        index: spec.start,
        len,
    };
    if len == 0 {
        return Err(out_of_range);
    }

    let resolved = if spec.start < 0 {
        len as isize + spec.start
    } else {
        spec.start
    };
    let start = match resolved {
        r if r >= len as isize => return Err(out_of_range),
        r if r < 0 && spec.open_ended => 0,
        r if r < 0 => return Err(out_of_range),
        r => r as usize,
    };

    if spec.open_ended || start == len - 1 {
        Ok(start..len)
    } else {
        Ok(start..start + 1)
    }
}

/// The sub-slice of `items` selected by `spec`, in original order.
pub fn select<T>(items: &[T], spec: RangeSpec) -> Result<&[T]> {
    let range = resolve(items.len(), spec)?;
    Ok(&items[range])
}
