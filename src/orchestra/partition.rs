use std::ops::Range;

use crate::error::{Result, SaxpyError};

/// A half-open range `[start, end)` of vector indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionRange {
    pub start: usize,
    pub end: usize,
}

impl PartitionRange {
    /// Returns the amount of indices in the range.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range holds no indices.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the range as a `std::ops::Range`, handy for slicing.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `[0, size)` into `threads` contiguous, ordered and disjoint ranges.
///
/// Every range but the last gets `size / threads` indices, the last one also
/// absorbs the remainder. With two threads this yields `[0, size/2)` and
/// `[size/2, size)`.
///
/// # Arguments
/// * `size` - The length of the vectors.
/// * `threads` - The amount of workers.
///
/// # Returns
/// The ranges in worker id order, or `InvalidArgument` if either input is zero
/// or there are more threads than elements.
pub fn plan(size: usize, threads: usize) -> Result<Vec<PartitionRange>> {
    if size == 0 {
        return Err(SaxpyError::InvalidArgument(
            "vector size must be positive".into(),
        ));
    }

    if threads == 0 {
        return Err(SaxpyError::InvalidArgument(
            "thread count must be positive".into(),
        ));
    }

    if threads > size {
        return Err(SaxpyError::InvalidArgument(format!(
            "thread count {threads} exceeds vector size {size}"
        )));
    }

    let chunk = size / threads;
    let ranges = (0..threads)
        .map(|t| {
            let start = t * chunk;
            let end = if t + 1 == threads { size } else { start + chunk };
            PartitionRange { start, end }
        })
        .collect();

    Ok(ranges)
}
