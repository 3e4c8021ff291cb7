use std::time::{Duration, Instant};

use log::{Level, debug, info, log_enabled};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::RunConfig,
    error::{Result, SaxpyError},
    orchestra::{AveragedSeries, Coordinator},
    vectors::{self, VectorStore},
};

/// The outcome of a run that went all the way through.
#[derive(Debug)]
pub struct Completed {
    /// The operands, with `Y` holding the final vector.
    pub store: VectorStore,
    /// The average of `Y` after every iteration.
    pub averages: AveragedSeries,
    /// Wall-clock time of the parallel phase and the reduction.
    pub elapsed: Duration,
}

/// A run executing in the background.
/// It lets its owner wait for the results or stop the workers early.
pub struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<Result<Completed>>,
}

impl Session {
    /// Validates `config` and starts the run on tokio's blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `config` - The run parameters, `config.size` must match the store.
    /// * `store` - The operands, handed back through `Completed`.
    ///
    /// # Returns
    /// `InvalidArgument` if the configuration is invalid or doesn't match
    /// the store. No thread is started in that case.
    pub fn start(config: RunConfig, store: VectorStore) -> Result<Self> {
        config.validate()?;

        if store.len() != config.size {
            return Err(SaxpyError::InvalidArgument(format!(
                "store holds {} elements but the config asks for {}",
                store.len(),
                config.size
            )));
        }

        if log_enabled!(Level::Debug) {
            debug!("operands before the run:\n{}", store.dump());
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let coordinator = Coordinator::new(config.threads, config.max_iters);

        let handle = tokio::task::spawn_blocking(move || {
            let mut store = store;
            let start = Instant::now();
            let averages = coordinator.run(&mut store, &token)?;
            let elapsed = start.elapsed();

            info!("run finished in {:.3} ms", elapsed.as_secs_f64() * 1000.);
            if log_enabled!(Level::Debug) {
                debug!("RES: final vector Y= {}", vectors::format_vector(store.y()));
            }
            Ok(Completed {
                store,
                averages,
                elapsed,
            })
        });

        Ok(Self { cancel, handle })
    }

    /// Asks every worker to stop at its next iteration.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a token that cancels this session when fired.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits until the run is over.
    ///
    /// # Returns
    /// The final vectors and averages, or the error that stopped the run.
    pub async fn wait(self) -> Result<Completed> {
        match self.handle.await {
            Ok(res) => res,
            Err(e) => Err(SaxpyError::ComputationFailure {
                worker_id: None,
                msg: e.to_string(),
            }),
        }
    }
}
