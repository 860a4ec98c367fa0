//! Analysis engine
//!
//! Three analyses over [`PiecewiseFunction`]s, all built on Simpson quadrature:
//!
//! - [`series`]: Fourier series coefficients over the function's own period
//! - [`transform`]: continuous Fourier transform over a symmetric ω grid
//! - [`convolution`]: `f * g` over a time grid, bounds from domain intersection
//!
//! [`Analyzer`] holds the tunables (harmonic cap, step count, default grids)
//! and runs [`Job`]s read from disk. Every analysis call is pure: the inputs are
//! immutable and each output sample is independent, so the outer loops run on
//! the rayon pool.

pub mod convolution;
pub mod series;
pub mod transform;

use crate::error::{AnalysisError, JobError};
use crate::job::{AnalysisKind, Job, JobResult, Outcome};
use crate::piecewise::PiecewiseFunction;
use crate::quadrature::DEFAULT_STEPS;
use crate::signal::build_function;
use convolution::{ConvolutionResult, TimeRange};
use series::{SeriesCoefficients, DEFAULT_HARMONICS};
use std::path::Path;
use std::time::Instant;
use transform::TransformResult;

/// Smallest accepted grid for transforms and convolutions.
pub const MIN_RESOLUTION: usize = 10;

pub const DEFAULT_RESOLUTION: usize = 200;
pub const DEFAULT_OMEGA_MAX: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Analyzer {
    /// Harmonics computed by series analysis
    pub harmonics: usize,
    /// Simpson sub-intervals per integral
    pub steps: usize,
    /// Transform grid half-width when a job does not give one
    pub omega_max: f64,
    /// Grid size for transforms and convolutions when a job does not give one
    pub resolution: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            harmonics: DEFAULT_HARMONICS,
            steps: DEFAULT_STEPS,
            omega_max: DEFAULT_OMEGA_MAX,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    pub fn with_harmonics(mut self, harmonics: usize) -> Self {
        self.harmonics = harmonics;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_omega_max(mut self, omega_max: f64) -> Self {
        self.omega_max = omega_max;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn compute_series(
        &self,
        pf: &PiecewiseFunction,
    ) -> Result<SeriesCoefficients, AnalysisError> {
        series::compute_series(pf, self.harmonics, self.steps)
    }

    pub fn compute_transform(
        &self,
        pf: &PiecewiseFunction,
    ) -> Result<TransformResult, AnalysisError> {
        transform::compute_transform(pf, self.omega_max, self.resolution, self.steps)
    }

    pub fn compute_convolution(
        &self,
        f: &PiecewiseFunction,
        g: &PiecewiseFunction,
        range: TimeRange,
    ) -> Result<ConvolutionResult, AnalysisError> {
        convolution::compute_convolution(f, g, range, self.resolution, self.steps)
    }

    /// Run one job, job-level overrides taking precedence over the tunables.
    pub fn run(&self, job: &Job) -> Result<Outcome, JobError> {
        let signal = build_function(&job.signal)?;
        self.run_on(job, &signal)
    }

    /// Run `job` and measure the time-domain energy of its signal, building
    /// the signal once for both.
    fn run_with_energy(&self, job: &Job) -> Result<(Outcome, f64), JobError> {
        let signal = build_function(&job.signal)?;
        let outcome = self.run_on(job, &signal)?;
        Ok((outcome, transform::total_energy(&signal, self.steps)))
    }

    fn run_on(&self, job: &Job, signal: &PiecewiseFunction) -> Result<Outcome, JobError> {
        let outcome = match job.analysis {
            AnalysisKind::Series { harmonics } => {
                let analyzer = self.clone().with_harmonics(harmonics.unwrap_or(self.harmonics));
                Outcome::Series(analyzer.compute_series(signal)?)
            }
            AnalysisKind::Transform {
                omega_max,
                resolution,
            } => {
                let analyzer = self
                    .clone()
                    .with_omega_max(omega_max.unwrap_or(self.omega_max))
                    .with_resolution(resolution.unwrap_or(self.resolution));
                Outcome::Transform(analyzer.compute_transform(signal)?)
            }
            AnalysisKind::Convolution { resolution, .. } => {
                let kernel = job.kernel.as_deref().ok_or(JobError::MissingKernel)?;
                let kernel = build_function(kernel)?;
                let range = job.analysis.time_range()?;
                let analyzer = self
                    .clone()
                    .with_resolution(resolution.unwrap_or(self.resolution));
                Outcome::Convolution(analyzer.compute_convolution(signal, &kernel, range)?)
            }
        };

        Ok(outcome)
    }

    /// Load and run the job at `path`. Never fails: errors land in the result.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> JobResult {
        let path = path.as_ref();
        let started = Instant::now();
        let mut result = JobResult::new(path);

        match Job::from_path(path) {
            Ok(job) => {
                if let Some(name) = &job.name {
                    result.name = name.clone();
                }
                result.kind = job.analysis.label().to_string();

                match self.run_with_energy(&job) {
                    Ok((outcome, energy)) => {
                        result.record(outcome);
                        result.energy = Some(energy);
                    }
                    Err(e) => {
                        log::warn!("{}: {}", result.file_name, e);
                        result.fail(e);
                    }
                }
            }
            Err(e) => {
                log::warn!("{}: {}", result.file_name, e);
                result.fail(e);
            }
        }

        result.elapsed_ms = started.elapsed().as_millis() as u64;
        result
    }
}
