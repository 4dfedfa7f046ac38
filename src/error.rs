//! Error taxonomy for the recognition engine.
//!
//! The core analysis functions are pure and mostly total: a medication or
//! day that cannot be matched is represented as an empty result or
//! "Unknown", never as an error. Errors are reserved for caller mistakes
//! (`InvalidInput`), missing backend credentials (`Configuration`) and
//! failures inside the network layer (`Backend`, `AnalysisTimeout`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// No vision backend credential is configured. The host is expected to
    /// catch this and fall back to the simulated backend.
    #[error("vision backend is not configured: {0}")]
    Configuration(String),

    /// The caller passed a value the engine refuses to work with
    /// (e.g. a daily dosage of zero).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The video analysis operation did not complete within the bounded
    /// polling window.
    #[error("analysis did not complete after {attempts} polls ({elapsed_secs}s)")]
    AnalysisTimeout { attempts: u32, elapsed_secs: u64 },

    /// Transport or protocol failure talking to the vision backend.
    #[error("backend request failed: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for RecognitionError {
    fn from(err: reqwest::Error) -> Self {
        RecognitionError::Backend(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecognitionError>;
