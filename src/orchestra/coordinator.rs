use std::{any::Any, mem, thread};

use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Result, SaxpyError},
    orchestra::{
        accumulator::{AccumulatorBuffer, AveragedSeries},
        partition::{self, PartitionRange},
        worker::SaxpyWorker,
    },
    vectors::VectorStore,
};

/// Launches one `SaxpyWorker` per partition, waits for all of them and
/// reduces their partial sums.
#[derive(Debug, Clone, Copy)]
pub struct Coordinator {
    threads: usize,
    max_iters: usize,
}

impl Coordinator {
    /// Creates a new `Coordinator`.
    ///
    /// # Arguments
    /// * `threads` - The amount of worker threads, one per partition.
    /// * `max_iters` - The amount of SAXPY iterations.
    pub fn new(threads: usize, max_iters: usize) -> Self {
        Self { threads, max_iters }
    }

    /// Runs the iterative SAXPY over `store`, updating its `Y` in place.
    ///
    /// Inputs are validated before any thread starts. Workers run on scoped
    /// threads, so `X` and `Y` are borrowed rather than shared through `Arc`s,
    /// and the reduction only starts once every worker has been joined.
    ///
    /// # Arguments
    /// * `store` - The operands, `Y` is overwritten with the final vector.
    /// * `cancel` - Stops the workers at their next iteration when fired.
    ///
    /// # Returns
    /// The per-iteration averages of `Y`. On error the contents of `Y` are
    /// unspecified and must not be reported.
    pub fn run(
        &self,
        store: &mut VectorStore,
        cancel: &CancellationToken,
    ) -> Result<AveragedSeries> {
        if self.max_iters == 0 {
            return Err(SaxpyError::InvalidArgument(
                "iteration count must be positive".into(),
            ));
        }

        let size = store.len();
        let ranges = partition::plan(size, self.threads)?;
        let mut acc = AccumulatorBuffer::new(self.max_iters, self.threads)?;

        info!(
            "running {} iteration(s) over {} element(s) with {} worker(s)",
            self.max_iters, size, self.threads
        );

        self.launch(store, &ranges, &mut acc, cancel)?;

        let averages = acc.reduce(size);
        debug!("reduced {} average(s)", averages.len());
        Ok(averages)
    }

    /// Spawns the workers on scoped threads and joins them all.
    ///
    /// # Returns
    /// The first failure in worker id order, if any.
    fn launch(
        &self,
        store: &mut VectorStore,
        ranges: &[PartitionRange],
        acc: &mut AccumulatorBuffer,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let run_token = cancel.child_token();
        let (x, mut y_rest, a) = store.split_mut();

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(ranges.len());
            let mut launch_err = None;

            for ((id, range), column) in ranges.iter().enumerate().zip(acc.columns_mut()) {
                let (y, tail) = mem::take(&mut y_rest).split_at_mut(range.len());
                y_rest = tail;

                let worker = SaxpyWorker::new(
                    id,
                    *range,
                    &x[range.as_range()],
                    y,
                    a,
                    column,
                    run_token.clone(),
                );

                let spawned = thread::Builder::new()
                    .name(format!("saxpy-worker-{id}"))
                    .spawn_scoped(scope, move || worker.run());

                match spawned {
                    Ok(handle) => handles.push((id, handle)),
                    Err(e) => {
                        warn!("failed to launch worker {id}: {e}");
                        run_token.cancel();
                        launch_err = Some(SaxpyError::ResourceExhaustion(format!(
                            "failed to launch worker {id}: {e}"
                        )));
                        break;
                    }
                }
            }

            debug!("launched {} worker(s), waiting", handles.len());

            let outcomes = handles
                .into_iter()
                .map(|(id, handle)| (id, handle.join()));
            settle(launch_err, outcomes, &run_token)
        })
    }
}

/// Drains the workers' outcomes in order, cancelling the rest of the run on
/// the first real failure.
///
/// # Arguments
/// * `first_err` - A failure that happened before any worker was joined.
/// * `outcomes` - Each worker's id and join result, in worker id order.
/// * `run_token` - Fired when a worker fails for a reason other than cancellation.
///
/// # Returns
/// The first failure, where a real failure wins over the cancellations it
/// triggers in other workers.
fn settle<I>(
    mut first_err: Option<SaxpyError>,
    outcomes: I,
    run_token: &CancellationToken,
) -> Result<()>
where
    I: IntoIterator<Item = (usize, thread::Result<Result<()>>)>,
{
    for (id, joined) in outcomes {
        let outcome = match joined {
            Ok(res) => res,
            Err(payload) => Err(SaxpyError::ComputationFailure {
                worker_id: Some(id),
                msg: panic_message(payload.as_ref()),
            }),
        };

        if let Err(e) = outcome {
            if !matches!(e, SaxpyError::Cancelled) {
                warn!("worker {id} failed: {e}");
                run_token.cancel();
            }
            if matches!(first_err, None | Some(SaxpyError::Cancelled)) {
                first_err = Some(e);
            }
        }
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "worker panicked".to_string()
    }
}
