use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SaxpyError};

/// Parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Length of `X` and `Y`.
    pub size: usize,
    /// Seed of the vector generator.
    pub seed: u64,
    /// Amount of worker threads.
    pub threads: usize,
    /// Amount of SAXPY iterations.
    pub max_iters: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size: 10_000_000,
            seed: 1,
            threads: 2,
            max_iters: 1000,
        }
    }
}

impl RunConfig {
    /// Loads a `RunConfig` from a JSON file, missing fields take their
    /// default values.
    ///
    /// # Arguments
    /// * `path` - The path of the JSON file.
    ///
    /// # Returns
    /// The parsed configuration, not yet validated.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks the configuration before anything is allocated.
    ///
    /// # Returns
    /// `InvalidArgument` if any count is zero or there are more threads than
    /// vector elements.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SaxpyError::InvalidArgument(
                "vector size must be positive".into(),
            ));
        }

        if self.threads == 0 {
            return Err(SaxpyError::InvalidArgument(
                "thread count must be positive".into(),
            ));
        }

        if self.max_iters == 0 {
            return Err(SaxpyError::InvalidArgument(
                "iteration count must be positive".into(),
            ));
        }

        if self.threads > self.size {
            return Err(SaxpyError::InvalidArgument(format!(
                "thread count {} exceeds vector size {}",
                self.threads, self.size
            )));
        }

        Ok(())
    }
}
