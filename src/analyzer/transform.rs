//! Continuous Fourier transform by quadrature
//!
//! Evaluates the continuous definition directly, one quadrature per
//! frequency sample. No FFT and no sampling of the time signal:
//!
//! ```text
//! F(ω) = ∫ f(t) e^{-jωt} dt
//!      = ∫ f(t) cos(ωt) dt  -  j ∫ f(t) sin(ωt) dt
//! ```
//!
//! The frequency grid is symmetric, `resolution` points from `-Ω` to `+Ω`
//! inclusive. Each sample depends only on the (immutable) input function, so
//! the grid is computed in parallel.
//!
//! ## Energy
//!
//! Parseval's theorem ties the two domains together:
//!
//! ```text
//! ∫ |f(t)|² dt = (1/2π) ∫ |F(ω)|² dω
//! ```
//!
//! [`total_energy`] computes the left side, [`parseval_energy`] approximates
//! the right side over `[-Ω, Ω]`. They agree once `Ω` covers the spectrum.

use super::MIN_RESOLUTION;
use crate::error::AnalysisError;
use crate::piecewise::{linspace, PiecewiseFunction};
use crate::quadrature::{simpson, trapezoid};
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use serde::Serialize;
use std::f64::consts::PI;

/// One point of the spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumSample {
    pub omega: f64,
    pub real: f64,
    pub imag: f64,
    pub magnitude: f64,
    /// Argument of `F(ω)` in `(-π, π]`
    pub phase: f64,
}

impl SpectrumSample {
    pub fn from_complex(omega: f64, value: Complex<f64>) -> Self {
        let mut phase = value.arg();
        if phase <= -PI {
            phase += 2.0 * PI;
        }
        Self {
            omega,
            real: value.re,
            imag: value.im,
            magnitude: value.norm(),
            phase,
        }
    }

    pub fn value(&self) -> Complex<f64> {
        Complex::new(self.real, self.imag)
    }
}

/// Spectrum over a symmetric frequency grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformResult {
    pub samples: Vec<SpectrumSample>,
}

impl TransformResult {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn omegas(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.omega).collect()
    }

    pub fn reals(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.real).collect()
    }

    pub fn imags(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.imag).collect()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.magnitude).collect()
    }

    pub fn phases(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.phase).collect()
    }

    /// `|F(ω)|²` per sample.
    pub fn energy_spectral_density(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.magnitude * s.magnitude).collect()
    }

    pub fn unwrapped_phase(&self) -> Vec<f64> {
        unwrap_phase(&self.phases())
    }

    /// Sample with the largest magnitude.
    pub fn peak(&self) -> Option<&SpectrumSample> {
        self.samples
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
    }
}

/// `F(ω)` at a single angular frequency.
pub fn spectrum_at(pf: &PiecewiseFunction, omega: f64, steps: usize) -> Complex<f64> {
    let (re, im) = pf.segments().iter().fold((0.0, 0.0), |(re, im), segment| {
        let (a, b) = (segment.domain_start(), segment.domain_end());
        let cos_part = simpson(|x| segment.evaluate_or_zero(x) * (omega * x).cos(), a, b, steps);
        let sin_part = simpson(|x| segment.evaluate_or_zero(x) * (omega * x).sin(), a, b, steps);
        (re + cos_part, im + sin_part)
    });

    // e^{-jωt} = cos(ωt) - j sin(ωt)
    Complex::new(re, -im)
}

/// Transform sampled at `resolution` points over `[-omega_max, omega_max]`.
pub fn compute_transform(
    pf: &PiecewiseFunction,
    omega_max: f64,
    resolution: usize,
    steps: usize,
) -> Result<TransformResult, AnalysisError> {
    if resolution < MIN_RESOLUTION {
        return Err(AnalysisError::InvalidResolution {
            resolution,
            minimum: MIN_RESOLUTION,
        });
    }
    if !omega_max.is_finite() || omega_max <= 0.0 {
        return Err(AnalysisError::InvalidRange(format!(
            "omega_max must be positive, got {}",
            omega_max
        )));
    }

    log::debug!(
        "transform: {} segments, omega in [-{}, {}], {} samples, {} steps",
        pf.segments().len(),
        omega_max,
        omega_max,
        resolution,
        steps
    );

    let samples = linspace(-omega_max, omega_max, resolution)
        .into_par_iter()
        .map(|omega| SpectrumSample::from_complex(omega, spectrum_at(pf, omega, steps)))
        .collect();

    Ok(TransformResult { samples })
}

/// Time-domain energy `∫ f(t)² dt`.
pub fn total_energy(pf: &PiecewiseFunction, steps: usize) -> f64 {
    pf.segments()
        .iter()
        .map(|segment| {
            simpson(
                |x| {
                    let v = segment.evaluate_or_zero(x);
                    v * v
                },
                segment.domain_start(),
                segment.domain_end(),
                steps,
            )
        })
        .sum()
}

/// Frequency-domain energy `(1/2π) ∫ |F(ω)|² dω` over `[-omega_max, omega_max]`.
///
/// Uses the trapezoid rule with `frequency_steps` panels over ω; every
/// panel node costs one [`spectrum_at`] with `steps` Simpson sub-intervals.
pub fn parseval_energy(
    pf: &PiecewiseFunction,
    omega_max: f64,
    frequency_steps: usize,
    steps: usize,
) -> Result<f64, AnalysisError> {
    if !omega_max.is_finite() || omega_max <= 0.0 {
        return Err(AnalysisError::InvalidRange(format!(
            "omega_max must be positive, got {}",
            omega_max
        )));
    }

    let integral = trapezoid(
        |omega| spectrum_at(pf, omega, steps).norm_sqr(),
        -omega_max,
        omega_max,
        frequency_steps,
    );
    Ok(integral / (2.0 * PI))
}

/// Remove artificial `2π` jumps from a phase sequence.
///
/// A jump above `π` between neighbours shifts everything after it by `-2π`,
/// a jump below `-π` by `+2π`.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut unwrapped = Vec::with_capacity(phase.len());
    let mut offset = 0.0;

    for (i, &p) in phase.iter().enumerate() {
        if i > 0 {
            let jump = p - phase[i - 1];
            if jump > PI {
                offset -= 2.0 * PI;
            } else if jump < -PI {
                offset += 2.0 * PI;
            }
        }
        unwrapped.push(p + offset);
    }

    unwrapped
}
