//! fourierlab - Fourier analysis of piecewise-defined functions
//!
//! fourierlab computes Fourier series, continuous Fourier transforms and
//! convolutions of functions defined segment by segment on contiguous
//! intervals, using numerical quadrature.
//!
//! # Overview
//!
//! A [`PiecewiseFunction`] is an ordered list of [`Segment`]s, each an evaluator
//! over `[domain_start, domain_end]`. Segments must tile the domain without
//! gaps; the function's period is the width of that domain.
//!
//! Every integral is taken segment by segment, so a jump between segments
//! never lands inside a Simpson panel. A segment that fails to evaluate at a
//! point (or returns NaN/inf) contributes zero there instead of aborting.
//!
//! # Analyses
//!
//! | Analysis | Output | Integral |
//! |----------|--------|----------|
//! | Series | `a0`, `an`, `bn` for `n = 1..N` | `(2/T) ∫ f(x)·cos/sin(2πnx/T) dx` |
//! | Transform | `F(ω)` on `[-Ω, Ω]` | `∫ f(t)·e^{-jωt} dt` |
//! | Convolution | `(f*g)(t)` on a time grid | `∫ f(τ)·g(t−τ) dτ` over the overlap |
//!
//! # Quick Start
//!
//! ```no_run
//! use fourierlab::{Analyzer, PiecewiseFunction, Segment, TimeRange};
//! use std::f64::consts::PI;
//!
//! // Square wave over one period
//! let square = PiecewiseFunction::new(vec![
//!     Segment::new(-PI, 0.0, |_| -1.0)?,
//!     Segment::new(0.0, PI, |_| 1.0)?,
//! ])?;
//!
//! let analyzer = Analyzer::new().with_harmonics(9);
//! let series = analyzer.compute_series(&square)?;
//! println!("b1 = {:.4}", series.bn.get(1).unwrap_or(0.0)); // 4/π
//!
//! let spectrum = analyzer.compute_transform(&square)?;
//! println!("{} spectrum samples", spectrum.len());
//!
//! let smoothed = analyzer.compute_convolution(&square, &square, TimeRange::Auto)?;
//! println!("peak {:?}", smoothed.peak());
//! # Ok::<(), fourierlab::AnalysisError>(())
//! ```
//!
//! Batch runs read JSON job files (see [`job`]) and return a [`JobResult`]
//! per file:
//!
//! ```no_run
//! use fourierlab::{Analyzer, Status};
//!
//! let result = Analyzer::new().analyze("jobs/square_wave.json");
//! match result.status {
//!     Status::Ok => println!("{} samples, peak {:?}", result.points, result.peak),
//!     Status::Error => println!("Couldn't run: {:?}", result.error),
//! }
//! ```
//!
//! # Modules
//!
//! - [`quadrature`]: Simpson, trapezoid and adaptive Simpson rules
//! - [`piecewise`]: segments, piecewise functions and sampling
//! - [`analyzer`]: series, transform and convolution engines
//! - [`signal`]: closed-form segment shapes for job files
//! - [`job`]: job files and result records
//! - [`report`]: Output formatters (JSON, CSV)

pub mod analyzer;
pub mod error;
pub mod job;
pub mod piecewise;
pub mod quadrature;
pub mod report;
pub mod signal;

pub use analyzer::convolution::{ConvolutionResult, TimeRange};
pub use analyzer::series::{Harmonics, SeriesCoefficients};
pub use analyzer::transform::{SpectrumSample, TransformResult};
pub use analyzer::{convolution, series, transform, Analyzer};
pub use error::{AnalysisError, EvaluationError, JobError};
pub use job::{AnalysisKind, Job, JobResult, Outcome, Peak, Status};
pub use piecewise::{FunctionData, PiecewiseFunction, Segment};
pub use rustfft::num_complex::Complex;
pub use signal::{SegmentSpec, Shape};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // These tests verify the public API surface is reachable from the crate
    // root.
    // ==========================================================================

    #[test]
    fn test_public_exports() {
        let _analyzer = Analyzer::new();
        let _: TimeRange = TimeRange::Auto;
        let _: Complex<f64> = Complex::new(1.0, 0.0);
        let _: Status = Status::Ok;
    }

    #[test]
    fn test_analyzer_accessible() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.harmonics, series::DEFAULT_HARMONICS);
    }

    #[test]
    fn test_piecewise_function_from_root() {
        let pf = PiecewiseFunction::new(vec![
            Segment::new(0.0, 1.0, |x| x).unwrap(),
            Segment::new(1.0, 2.0, |x| 2.0 - x).unwrap(),
        ])
        .unwrap();
        assert_eq!(pf.period(), 2.0);
        assert_eq!(pf.evaluate_at(1.5), 0.5);
    }

    #[test]
    fn test_error_types_from_root() {
        assert_eq!(
            AnalysisError::InvalidPeriod(0.0).to_string(),
            "Invalid period: 0 (must be positive)"
        );
        assert_eq!(
            EvaluationError::new(0.5, "pole").to_string(),
            "Evaluation failed at x = 0.5: pole"
        );
        let job_error: JobError = AnalysisError::InvalidRange("empty".to_string()).into();
        assert_eq!(job_error.to_string(), "Invalid range: empty");
    }
}
