//! Convolution of two compactly supported piecewise functions
//!
//! ```text
//! (f * g)(t) = ∫ f(τ) g(t − τ) dτ
//! ```
//!
//! # Integration bounds
//!
//! `f` lives on `[fStart, fEnd]` and `g` on `[gStart, gEnd]`, so for a given
//! `t` the integrand can only be nonzero where both hold:
//!
//! ```text
//! τ ∈ [fStart, fEnd]   and   t − τ ∈ [gStart, gEnd]  ⇔  τ ∈ [t − gEnd, t − gStart]
//!
//! τMin = max(fStart, t − gEnd)
//! τMax = min(fEnd,   t − gStart)
//! ```
//!
//! When `τMin >= τMax` the supports do not meet and the answer is exactly 0;
//! no quadrature runs and neither function is evaluated.
//!
//! # Automatic range
//!
//! The true result is supported on `[fStart + gStart, fEnd + gEnd]`, which is
//! what [`TimeRange::Auto`] resolves to.
//!
//! The `generate_*` and [`calculate_product`] helpers sample the integrand
//! for inspection; they never integrate.

use super::MIN_RESOLUTION;
use crate::error::AnalysisError;
use crate::piecewise::{linspace, FunctionData, PiecewiseFunction};
use crate::quadrature::simpson;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Time grid bounds for a convolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Exact support of the result, `[fStart + gStart, fEnd + gEnd]`.
    #[default]
    Auto,
    Manual { t_min: f64, t_max: f64 },
}

impl TimeRange {
    /// Concrete `(t_min, t_max)` for this pair of operands.
    pub fn resolve(
        &self,
        f: &PiecewiseFunction,
        g: &PiecewiseFunction,
    ) -> Result<(f64, f64), AnalysisError> {
        match *self {
            TimeRange::Auto => Ok((
                f.domain_start() + g.domain_start(),
                f.domain_end() + g.domain_end(),
            )),
            TimeRange::Manual { t_min, t_max } => {
                if !t_min.is_finite() || !t_max.is_finite() {
                    return Err(AnalysisError::InvalidRange(format!(
                        "time range must be finite, got [{}, {}]",
                        t_min, t_max
                    )));
                }
                if t_max <= t_min {
                    return Err(AnalysisError::InvalidRange(format!(
                        "t_max {} must be above t_min {}",
                        t_max, t_min
                    )));
                }
                Ok((t_min, t_max))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConvolutionResult {
    pub t: Vec<f64>,
    pub value: Vec<f64>,
}

impl ConvolutionResult {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// `(t, value)` of the sample with the largest absolute value.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.t
            .iter()
            .zip(&self.value)
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(&t, &v)| (t, v))
    }
}

/// `τ` interval where both `f(τ)` and `g(t − τ)` can be nonzero, if any.
pub fn overlap(f: &PiecewiseFunction, g: &PiecewiseFunction, t: f64) -> Option<(f64, f64)> {
    let tau_min = f.domain_start().max(t - g.domain_end());
    let tau_max = f.domain_end().min(t - g.domain_start());
    (tau_min < tau_max).then_some((tau_min, tau_max))
}

/// `(f * g)(t)` at a single `t`.
pub fn convolve_at(f: &PiecewiseFunction, g: &PiecewiseFunction, t: f64, steps: usize) -> f64 {
    match overlap(f, g, t) {
        Some((tau_min, tau_max)) => simpson(
            |tau| f.evaluate_at(tau) * g.evaluate_at(t - tau),
            tau_min,
            tau_max,
            steps,
        ),
        None => 0.0,
    }
}

/// Convolution sampled at `resolution` points over the resolved time range.
pub fn compute_convolution(
    f: &PiecewiseFunction,
    g: &PiecewiseFunction,
    range: TimeRange,
    resolution: usize,
    steps: usize,
) -> Result<ConvolutionResult, AnalysisError> {
    let (t_min, t_max) = range.resolve(f, g)?;
    if resolution < MIN_RESOLUTION {
        return Err(AnalysisError::InvalidResolution {
            resolution,
            minimum: MIN_RESOLUTION,
        });
    }

    log::debug!(
        "convolution: t in [{}, {}], {} samples, {} steps ({:?} range)",
        t_min,
        t_max,
        resolution,
        steps,
        range
    );

    let t = linspace(t_min, t_max, resolution);
    let value = t
        .par_iter()
        .map(|&t| convolve_at(f, g, t, steps))
        .collect();

    Ok(ConvolutionResult { t, value })
}

/// Dense samples of `f(τ)` over its own domain.
pub fn generate_function_data(f: &PiecewiseFunction, points: usize) -> FunctionData {
    f.sample(points)
}

/// Dense samples of `g(t − τ)` for fixed `t` over `[tau_min, tau_max]`.
pub fn generate_shifted_g(
    g: &PiecewiseFunction,
    t: f64,
    tau_min: f64,
    tau_max: f64,
    points: usize,
) -> FunctionData {
    let x = linspace(tau_min, tau_max, points);
    let y = x.iter().map(|&tau| g.evaluate_at(t - tau)).collect();
    FunctionData { x, y }
}

/// Elementwise product of two equally long sample arrays.
pub fn calculate_product(a: &[f64], b: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if a.len() != b.len() {
        return Err(AnalysisError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}
