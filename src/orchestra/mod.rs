//! The parallel part of the run: partitioning, workers, and the reduction
//! of their partial sums.

pub mod accumulator;
pub mod coordinator;
pub mod partition;
pub mod worker;

pub use accumulator::{AccumulatorBuffer, AveragedSeries};
pub use coordinator::Coordinator;
pub use partition::{PartitionRange, plan};
pub use worker::SaxpyWorker;
