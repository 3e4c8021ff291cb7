use std::ops::Index;

use log::debug;

use crate::{
    error::{Result, SaxpyError},
    vectors::try_zeroed,
};

/// Per-iteration partial sums of Y, one column per worker.
///
/// The buffer is worker-major: `(iteration, worker)` lives at the flat offset
/// `iteration + worker * max_iters`, so each worker's writes stay contiguous
/// and never share a cache line with another worker's column except at the
/// column boundaries.
#[derive(Debug)]
pub struct AccumulatorBuffer {
    max_iters: usize,
    workers: usize,
    sums: Box<[f64]>,
}

impl AccumulatorBuffer {
    /// Creates a new zeroed `AccumulatorBuffer`.
    ///
    /// # Arguments
    /// * `max_iters` - The amount of iterations per worker.
    /// * `workers` - The amount of worker columns.
    ///
    /// # Returns
    /// `InvalidArgument` if either dimension is zero, `ResourceExhaustion` if
    /// the buffer can't be allocated.
    pub fn new(max_iters: usize, workers: usize) -> Result<Self> {
        if max_iters == 0 || workers == 0 {
            return Err(SaxpyError::InvalidArgument(format!(
                "accumulator needs at least one iteration and one worker, got {max_iters} x {workers}"
            )));
        }

        let len = max_iters.checked_mul(workers).ok_or_else(|| {
            SaxpyError::ResourceExhaustion(format!(
                "accumulator of {max_iters} x {workers} overflows"
            ))
        })?;

        Ok(Self {
            max_iters,
            workers,
            sums: try_zeroed(len, "accumulator buffer")?.into_boxed_slice(),
        })
    }

    /// Returns the flat offset of `(iteration, worker)`.
    pub fn offset(&self, iteration: usize, worker: usize) -> usize {
        iteration + worker * self.max_iters
    }

    /// Returns one worker's column: its partial sums for every iteration.
    pub fn column(&self, worker: usize) -> &[f64] {
        let start = self.offset(0, worker);
        &self.sums[start..start + self.max_iters]
    }

    /// Splits the buffer into one exclusive mutable column per worker, in
    /// worker id order.
    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut [f64]> {
        self.sums.chunks_exact_mut(self.max_iters)
    }

    /// Combines every worker's partial sums into the per-iteration average of Y.
    ///
    /// Columns are added in ascending worker id order, starting from worker `0`,
    /// and the total is divided by `size`. The buffer is left untouched, so
    /// reducing twice yields the same series.
    ///
    /// # Arguments
    /// * `size` - The length of the vectors the sums were taken over.
    pub fn reduce(&self, size: usize) -> AveragedSeries {
        debug!(
            "reducing {} column(s) over {} iteration(s)",
            self.workers, self.max_iters
        );

        let divisor = size as f64;
        let averages = (0..self.max_iters)
            .map(|it| {
                let mut total = self.sums[self.offset(it, 0)];
                for t in 1..self.workers {
                    total += self.sums[self.offset(it, t)];
                }
                total / divisor
            })
            .collect();

        AveragedSeries(averages)
    }
}

impl Index<(usize, usize)> for AccumulatorBuffer {
    type Output = f64;

    fn index(&self, (iteration, worker): (usize, usize)) -> &f64 {
        &self.sums[self.offset(iteration, worker)]
    }
}

/// The average of Y after every iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedSeries(Vec<f64>);

impl AveragedSeries {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
