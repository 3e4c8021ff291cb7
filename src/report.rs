use std::fmt;

use serde::Serialize;

use crate::{config::RunConfig, session::Completed};

/// The amount of trailing values shown for `Y` and the averages.
pub const TAIL_LEN: usize = 3;

/// What gets shown to the user once a run completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub config: RunConfig,
    pub elapsed_ms: f64,
    pub y_tail: Vec<f64>,
    pub averages_tail: Vec<f64>,
}

impl RunReport {
    /// Builds a `RunReport` from a completed run.
    ///
    /// # Arguments
    /// * `config` - The parameters the run used.
    /// * `completed` - The run's outcome.
    pub fn new(config: RunConfig, completed: &Completed) -> Self {
        Self {
            config,
            elapsed_ms: completed.elapsed.as_secs_f64() * 1000.,
            y_tail: tail(completed.store.y()),
            averages_tail: tail(completed.averages.as_slice()),
        }
    }
}

/// The last `TAIL_LEN` values, or all of them for shorter slices.
fn tail(values: &[f64]) -> Vec<f64> {
    values[values.len().saturating_sub(TAIL_LEN)..].to_vec()
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.6}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Execution time: {:.6} ms", self.elapsed_ms)?;
        writeln!(f, "Last {TAIL_LEN} values of Y: {}", join(&self.y_tail))?;
        write!(
            f,
            "Last {TAIL_LEN} values of Y_avgs: {}",
            join(&self.averages_tail)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_keeps_last_three() {
        assert_eq!(tail(&[1., 2., 3., 4., 5.]), [3., 4., 5.]);
        assert_eq!(tail(&[1., 2.]), [1., 2.]);
        assert!(tail(&[]).is_empty());
    }

    #[test]
    fn display_mirrors_text_output() {
        let report = RunReport {
            config: RunConfig::default(),
            elapsed_ms: 12.5,
            y_tail: vec![1., 2., 3.],
            averages_tail: vec![0.5, 0.25, 0.125],
        };

        assert_eq!(
            report.to_string(),
            "Execution time: 12.500000 ms\n\
             Last 3 values of Y: 1.000000, 2.000000, 3.000000\n\
             Last 3 values of Y_avgs: 0.500000, 0.250000, 0.125000"
        );
    }

    #[test]
    fn serializes_to_json() {
        let report = RunReport {
            config: RunConfig {
                size: 4,
                seed: 1,
                threads: 2,
                max_iters: 1,
            },
            elapsed_ms: 1.,
            y_tail: vec![2., 2., 2.],
            averages_tail: vec![2.],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["config"]["threads"], 2);
        assert_eq!(json["averages_tail"][0], 2.0);
    }
}
