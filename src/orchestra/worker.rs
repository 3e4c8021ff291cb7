use log::debug;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Result, SaxpyError},
    orchestra::partition::PartitionRange,
};

/// Runs the iterative SAXPY over one partition of the vectors.
///
/// A worker only ever sees its own slice of `Y` and its own accumulator
/// column, so it never needs to synchronize with its peers.
pub struct SaxpyWorker<'a> {
    id: usize,
    range: PartitionRange,
    x: &'a [f64],
    y: &'a mut [f64],
    a: f64,
    column: &'a mut [f64],
    cancel: CancellationToken,
}

impl<'a> SaxpyWorker<'a> {
    /// Creates a new `SaxpyWorker`.
    ///
    /// # Arguments
    /// * `id` - The worker id, also the index of its accumulator column.
    /// * `range` - The indices this worker owns, used for logging.
    /// * `x` - The worker's slice of `X`.
    /// * `y` - The worker's slice of `Y`, same length as `x`.
    /// * `a` - The scalar multiplier.
    /// * `column` - The worker's partial sums, one slot per iteration.
    /// * `cancel` - Checked once per iteration.
    pub fn new(
        id: usize,
        range: PartitionRange,
        x: &'a [f64],
        y: &'a mut [f64],
        a: f64,
        column: &'a mut [f64],
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            range,
            x,
            y,
            a,
            column,
            cancel,
        }
    }

    /// Applies `Y = Y + a * X` once per accumulator slot, adding every
    /// updated `Y` value to that iteration's partial sum.
    ///
    /// Indices are visited in ascending order on every iteration so the
    /// rounding of the partial sums is reproducible.
    ///
    /// # Returns
    /// `ComputationFailure` if the slices don't match, `Cancelled` if the
    /// token fired before the last iteration.
    pub fn run(self) -> Result<()> {
        if self.x.len() != self.y.len() || self.x.len() != self.range.len() {
            return Err(SaxpyError::ComputationFailure {
                worker_id: Some(self.id),
                msg: format!(
                    "slice lengths X={} Y={} don't match range {:?}",
                    self.x.len(),
                    self.y.len(),
                    self.range
                ),
            });
        }

        debug!(
            "worker {} running [{}, {}) for {} iteration(s)",
            self.id,
            self.range.start,
            self.range.end,
            self.column.len()
        );

        let a = self.a;
        for slot in self.column.iter_mut() {
            if self.cancel.is_cancelled() {
                debug!("worker {} cancelled", self.id);
                return Err(SaxpyError::Cancelled);
            }

            for (yi, xi) in self.y.iter_mut().zip(self.x) {
                *yi += a * xi;
                *slot += *yi;
            }
        }

        debug!("worker {} finished", self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> PartitionRange {
        PartitionRange { start, end }
    }

    #[test]
    fn updates_y_and_accumulates_each_iteration() {
        let x = [1., 2.];
        let mut y = [0., 1.];
        let mut column = [0.; 3];

        let worker = SaxpyWorker::new(
            0,
            range(0, 2),
            &x,
            &mut y,
            0.5,
            &mut column,
            CancellationToken::new(),
        );
        worker.run().unwrap();

        // y after each iteration: [0.5, 2], [1, 3], [1.5, 4]
        assert_eq!(y, [1.5, 4.]);
        assert_eq!(column, [2.5, 4., 5.5]);
    }

    #[test]
    fn empty_range_does_no_work() {
        let mut column = [0.; 2];
        let worker = SaxpyWorker::new(
            1,
            range(3, 3),
            &[],
            &mut [],
            2.,
            &mut column,
            CancellationToken::new(),
        );

        worker.run().unwrap();
        assert_eq!(column, [0., 0.]);
    }

    #[test]
    fn cancelled_token_stops_before_any_update() {
        let x = [1.];
        let mut y = [0.];
        let mut column = [0.; 4];
        let cancel = CancellationToken::new();
        cancel.cancel();

        let worker = SaxpyWorker::new(0, range(0, 1), &x, &mut y, 1., &mut column, cancel);
        assert!(matches!(worker.run(), Err(SaxpyError::Cancelled)));
        assert_eq!(y, [0.]);
    }

    #[test]
    fn mismatched_slices_fail() {
        let x = [1., 1.];
        let mut y = [0.];
        let mut column = [0.];

        let worker = SaxpyWorker::new(
            2,
            range(0, 2),
            &x,
            &mut y,
            1.,
            &mut column,
            CancellationToken::new(),
        );

        assert!(matches!(
            worker.run(),
            Err(SaxpyError::ComputationFailure {
                worker_id: Some(2),
                ..
            })
        ));
    }
}
