use std::{error::Error, fmt, io};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, SaxpyError>;

/// All the ways a run can fail. Every variant is fatal to the run.
#[derive(Debug)]
pub enum SaxpyError {
    /// Rejected inputs, caught before any worker is launched.
    InvalidArgument(String),
    /// Failed to allocate a buffer or to spawn a worker thread.
    ResourceExhaustion(String),
    /// A worker, or the run hosting the workers, died while computing.
    ComputationFailure {
        worker_id: Option<usize>,
        msg: String,
    },
    /// The run was stopped through its cancellation token.
    Cancelled,
    /// A configuration file could not be parsed.
    Config(String),
    /// An underlying I/O error not covered by the above variants.
    Io(io::Error),
}

impl fmt::Display for SaxpyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::ResourceExhaustion(msg) => write!(f, "resource exhaustion: {msg}"),
            Self::ComputationFailure {
                worker_id: Some(id),
                msg,
            } => write!(f, "computation failure in worker {id}: {msg}"),
            Self::ComputationFailure {
                worker_id: None,
                msg,
            } => write!(f, "computation failure: {msg}"),
            Self::Cancelled => write!(f, "run cancelled"),
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
            Self::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for SaxpyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SaxpyError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SaxpyError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure_kind() {
        let err = SaxpyError::InvalidArgument("threads must be positive".into());
        assert_eq!(err.to_string(), "invalid argument: threads must be positive");

        let err = SaxpyError::ComputationFailure {
            worker_id: Some(3),
            msg: "boom".into(),
        };
        assert_eq!(err.to_string(), "computation failure in worker 3: boom");

        let err = SaxpyError::ComputationFailure {
            worker_id: None,
            msg: "boom".into(),
        };
        assert_eq!(err.to_string(), "computation failure: boom");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = SaxpyError::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(err.source().is_some());
        assert!(SaxpyError::Cancelled.source().is_none());
    }
}
