//! Job files and their results
//!
//! A job is one JSON document naming an analysis and the signal(s) it runs on:
//!
//! ```json
//! {
//!   "name": "square wave",
//!   "analysis": { "type": "series", "harmonics": 25 },
//!   "signal": [
//!     { "start": -3.14159, "end": 0.0, "shape": { "kind": "constant", "value": -1.0 } },
//!     { "start": 0.0, "end": 3.14159, "shape": { "kind": "constant", "value": 1.0 } }
//!   ]
//! }
//! ```
//!
//! Optional analysis fields fall back to the [`Analyzer`](crate::Analyzer)
//! defaults. Convolution jobs also need a `kernel` signal (the `g` in `f * g`).

use crate::analyzer::convolution::{ConvolutionResult, TimeRange};
use crate::analyzer::series::SeriesCoefficients;
use crate::analyzer::transform::TransformResult;
use crate::error::{AnalysisError, JobError};
use crate::signal::SegmentSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisKind {
    Series {
        harmonics: Option<usize>,
    },
    Transform {
        omega_max: Option<f64>,
        resolution: Option<usize>,
    },
    Convolution {
        t_min: Option<f64>,
        t_max: Option<f64>,
        resolution: Option<usize>,
    },
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Series { .. } => "series",
            AnalysisKind::Transform { .. } => "transform",
            AnalysisKind::Convolution { .. } => "convolution",
        }
    }

    /// Time range of a convolution job; both bounds or neither.
    pub fn time_range(&self) -> Result<TimeRange, AnalysisError> {
        match *self {
            AnalysisKind::Convolution {
                t_min: Some(t_min),
                t_max: Some(t_max),
                ..
            } => Ok(TimeRange::Manual { t_min, t_max }),
            AnalysisKind::Convolution {
                t_min: None,
                t_max: None,
                ..
            } => Ok(TimeRange::Auto),
            AnalysisKind::Convolution { .. } => Err(AnalysisError::InvalidRange(
                "give both t_min and t_max, or neither".to_string(),
            )),
            _ => Ok(TimeRange::Auto),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: Option<String>,
    pub analysis: AnalysisKind,
    pub signal: Vec<SegmentSpec>,
    pub kernel: Option<Vec<SegmentSpec>>,
}

impl Job {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, JobError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl std::str::FromStr for Job {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Output of one analysis run.
#[derive(Debug, Clone)]
pub enum Outcome {
    Series(SeriesCoefficients),
    Transform(TransformResult),
    Convolution(ConvolutionResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

/// Headline number of a result, for one-line summaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Harmonic number, angular frequency or time
    pub at: f64,
    pub value: f64,
}

impl Outcome {
    /// Strongest harmonic, spectral peak, or largest convolution sample.
    pub fn peak(&self) -> Option<Peak> {
        match self {
            Outcome::Series(series) => (1..=series.harmonics())
                .filter_map(|n| series.amplitude(n).map(|a| (n, a)))
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(n, a)| Peak {
                    at: n as f64,
                    value: a,
                }),
            Outcome::Transform(transform) => transform.peak().map(|s| Peak {
                at: s.omega,
                value: s.magnitude,
            }),
            Outcome::Convolution(convolution) => convolution
                .peak()
                .map(|(t, value)| Peak { at: t, value }),
        }
    }

    /// Number of output samples (harmonics, frequencies or times).
    pub fn points(&self) -> usize {
        match self {
            Outcome::Series(series) => series.harmonics(),
            Outcome::Transform(transform) => transform.len(),
            Outcome::Convolution(convolution) => convolution.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub file_path: String,
    pub file_name: String,
    pub name: String,
    pub kind: String,
    pub status: Status,
    pub points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak: Option<Peak>,
    /// Time-domain energy of the signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesCoefficients>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convolution: Option<ConvolutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl JobResult {
    /// Empty result for `path`, status `Error` until filled in.
    pub fn new(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            file_path: path.display().to_string(),
            file_name,
            name,
            kind: "unknown".to_string(),
            status: Status::Error,
            points: 0,
            peak: None,
            energy: None,
            series: None,
            transform: None,
            convolution: None,
            error: None,
            elapsed_ms: 0,
        }
    }

    /// Store an outcome, marking the result `Ok`.
    pub fn record(&mut self, outcome: Outcome) {
        self.status = Status::Ok;
        self.points = outcome.points();
        self.peak = outcome.peak();
        match outcome {
            Outcome::Series(series) => self.series = Some(series),
            Outcome::Transform(transform) => self.transform = Some(transform),
            Outcome::Convolution(convolution) => self.convolution = Some(convolution),
        }
    }

    pub fn fail(&mut self, error: impl fmt::Display) {
        self.status = Status::Error;
        self.error = Some(error.to_string());
    }
}
