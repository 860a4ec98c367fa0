//! Error types
//!
//! Structural problems with an input (bad domains, bad grids) are fatal and
//! surface as [`AnalysisError`]. A failure to evaluate a segment at a single
//! point is an [`EvaluationError`]; the analyzers absorb those as zeros, so
//! they only escape through the fallible `try_*` quadrature entry points.

use thiserror::Error;

/// Fatal, structural failures of an analysis call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("Discontinuous domain: segment {index} ends at {end} but the next segment starts at {start}")]
    DiscontinuousDomain { index: usize, end: f64, start: f64 },

    #[error("Invalid period: {0} (must be positive)")]
    InvalidPeriod(f64),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid resolution: {resolution} (need at least {minimum})")]
    InvalidResolution { resolution: usize, minimum: usize },

    #[error("Length mismatch: {left} samples vs {right} samples")]
    LengthMismatch { left: usize, right: usize },
}

/// A segment evaluator could not produce a value at `x`.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Evaluation failed at x = {x}: {reason}")]
pub struct EvaluationError {
    pub x: f64,
    pub reason: String,
}

impl EvaluationError {
    pub fn new(x: f64, reason: impl Into<String>) -> Self {
        Self {
            x,
            reason: reason.into(),
        }
    }
}

/// Failures while loading or running a job file.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Convolution job needs a `kernel` signal")]
    MissingKernel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discontinuous_message_names_boundaries() {
        let err = AnalysisError::DiscontinuousDomain {
            index: 0,
            end: 0.0,
            start: 0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("segment 0"), "got: {}", msg);
        assert!(msg.contains("0.5"), "got: {}", msg);
    }

    #[test]
    fn test_job_error_wraps_analysis_error_transparently() {
        let inner = AnalysisError::InvalidPeriod(-1.0);
        let outer: JobError = inner.clone().into();
        assert_eq!(outer.to_string(), inner.to_string());
    }

    #[test]
    fn test_evaluation_error_display() {
        let err = EvaluationError::new(2.0, "division by zero");
        assert_eq!(err.to_string(), "Evaluation failed at x = 2: division by zero");
    }
}
