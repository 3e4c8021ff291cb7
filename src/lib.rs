//! Iterative SAXPY (`Y = Y + a * X`) split across a fixed set of worker
//! threads, with the average of `Y` recorded after every iteration.

pub mod config;
pub mod error;
pub mod orchestra;
pub mod report;
pub mod session;
pub mod vectors;

pub use config::RunConfig;
pub use error::{Result, SaxpyError};
pub use orchestra::{AccumulatorBuffer, AveragedSeries, Coordinator, PartitionRange};
pub use report::RunReport;
pub use session::{Completed, Session};
pub use vectors::VectorStore;
