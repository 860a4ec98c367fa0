//! Fourier series coefficients of a piecewise function
//!
//! The function is treated as one period of a periodic signal, period
//! `T = domain_end - domain_start`. Coefficients use the `2/T` normalisation:
//!
//! ```text
//! a0 = (2/T) ∫ f(x) dx
//! an = (2/T) ∫ f(x) cos(2πnx/T) dx
//! bn = (2/T) ∫ f(x) sin(2πnx/T) dx
//!
//! f(x) ≈ a0/2 + Σ an cos(2πnx/T) + bn sin(2πnx/T)
//! ```
//!
//! Each integral is the sum of one Simpson integral per segment, so every
//! segment is integrated with its own evaluator, right up to its own edges.
//! That keeps value jumps at segment boundaries out of the quadrature nodes.

use crate::error::AnalysisError;
use crate::piecewise::{linspace, FunctionData, PiecewiseFunction};
use crate::quadrature::simpson;
use rayon::prelude::*;
use serde::Serialize;
use std::f64::consts::PI;

/// Default harmonic cap.
pub const DEFAULT_HARMONICS: usize = 50;

/// Coefficients indexed by harmonic number, starting at 1.
///
/// There is no slot 0: `get(0)` is `None`, `get(1)` is the fundamental.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Harmonics(Vec<f64>);

impl Harmonics {
    pub fn get(&self, n: usize) -> Option<f64> {
        n.checked_sub(1).and_then(|i| self.0.get(i).copied())
    }

    /// Highest harmonic stored.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(n, coefficient)` pairs, `n` from 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().enumerate().map(|(i, &c)| (i + 1, c))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

impl FromIterator<f64> for Harmonics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesCoefficients {
    pub a0: f64,
    pub an: Harmonics,
    pub bn: Harmonics,
    pub period: f64,
    pub domain_start: f64,
}

impl SeriesCoefficients {
    pub fn harmonics(&self) -> usize {
        self.an.len()
    }

    /// `sqrt(an² + bn²)` for harmonic `n`.
    pub fn amplitude(&self, n: usize) -> Option<f64> {
        Some(self.an.get(n)?.hypot(self.bn.get(n)?))
    }

    /// Series truncated after `terms` harmonics, evaluated at `x`.
    pub fn partial_sum(&self, x: f64, terms: usize) -> f64 {
        let w = 2.0 * PI * x / self.period;
        self.an
            .iter()
            .zip(self.bn.iter())
            .take(terms)
            .fold(self.a0 / 2.0, |acc, ((n, a), (_, b))| {
                let (sin, cos) = (n as f64 * w).sin_cos();
                acc + a * cos + b * sin
            })
    }

    /// Partial sum sampled over one period starting at `domain_start`.
    pub fn reconstruct(&self, points: usize, terms: usize) -> FunctionData {
        let x = linspace(self.domain_start, self.domain_start + self.period, points);
        let y = x.iter().map(|&x| self.partial_sum(x, terms)).collect();
        FunctionData { x, y }
    }
}

/// Compute `a0` and the first `harmonics` pairs `(an, bn)`.
pub fn compute_series(
    pf: &PiecewiseFunction,
    harmonics: usize,
    steps: usize,
) -> Result<SeriesCoefficients, AnalysisError> {
    let period = pf.period();
    if period <= 0.0 || !period.is_finite() {
        return Err(AnalysisError::InvalidPeriod(period));
    }
    if harmonics == 0 {
        return Err(AnalysisError::InvalidResolution {
            resolution: harmonics,
            minimum: 1,
        });
    }

    log::debug!(
        "series: {} segments, period {}, {} harmonics, {} steps",
        pf.segments().len(),
        period,
        harmonics,
        steps
    );

    let scale = 2.0 / period;
    let a0 = scale * integrate_segments(pf, steps, |_| 1.0);

    let pairs: Vec<(f64, f64)> = (1..=harmonics)
        .into_par_iter()
        .map(|n| {
            let k = 2.0 * PI * n as f64 / period;
            let an = scale * integrate_segments(pf, steps, |x| (k * x).cos());
            let bn = scale * integrate_segments(pf, steps, |x| (k * x).sin());
            (an, bn)
        })
        .collect();

    let (an, bn): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();

    Ok(SeriesCoefficients {
        a0,
        an: Harmonics(an),
        bn: Harmonics(bn),
        period,
        domain_start: pf.domain_start(),
    })
}

/// `Σ_segments ∫ seg(x) · weight(x) dx`, each segment with fail-to-zero.
fn integrate_segments<W>(pf: &PiecewiseFunction, steps: usize, weight: W) -> f64
where
    W: Fn(f64) -> f64,
{
    pf.segments()
        .iter()
        .map(|segment| {
            simpson(
                |x| segment.evaluate_or_zero(x) * weight(x),
                segment.domain_start(),
                segment.domain_end(),
                steps,
            )
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piecewise::Segment;
    use approx::assert_abs_diff_eq;

    // ==========================================================================
    // KNOWN SERIES TESTS
    // ==========================================================================
    //
    // f(t) = t on [-π, π] is odd, so every cosine term vanishes and
    //   bn = 2·(-1)^(n+1) / n
    //
    // The square wave (-1 on [-π, 0], +1 on [0, π]) has
    //   bn = 4 / (nπ) for odd n, 0 for even n
    // and exercises per-segment integration across a value jump.
    // ==========================================================================

    #[test]
    fn test_sawtooth_coefficients() {
        let pf = PiecewiseFunction::single(-PI, PI, |t| t).unwrap();
        let series = compute_series(&pf, DEFAULT_HARMONICS, 1000).unwrap();

        assert_eq!(series.harmonics(), 50);
        assert_abs_diff_eq!(series.a0, 0.0, epsilon = 1e-3);
        for n in 1..=50 {
            let expected = 2.0 * (-1.0_f64).powi(n as i32 + 1) / n as f64;
            assert_abs_diff_eq!(series.an.get(n).unwrap(), 0.0, epsilon = 1e-3);
            assert_abs_diff_eq!(series.bn.get(n).unwrap(), expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_square_wave_coefficients() {
        let pf = PiecewiseFunction::new(vec![
            Segment::new(-PI, 0.0, |_| -1.0).unwrap(),
            Segment::new(0.0, PI, |_| 1.0).unwrap(),
        ])
        .unwrap();
        let series = compute_series(&pf, 15, 1000).unwrap();

        assert_abs_diff_eq!(series.a0, 0.0, epsilon = 1e-9);
        for (n, bn) in series.bn.iter() {
            let expected = if n % 2 == 1 { 4.0 / (n as f64 * PI) } else { 0.0 };
            assert_abs_diff_eq!(bn, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_constant_has_only_dc_term() {
        let pf = PiecewiseFunction::single(0.0, 2.0, |_| 3.0).unwrap();
        let series = compute_series(&pf, 10, 1000).unwrap();

        // a0 = (2/T)·3·T = 6, so a0/2 recovers the constant
        assert_abs_diff_eq!(series.a0, 6.0, epsilon = 1e-9);
        assert_abs_diff_eq!(series.partial_sum(0.7, 10), 3.0, epsilon = 1e-6);
        for n in 1..=10 {
            assert_abs_diff_eq!(series.amplitude(n).unwrap(), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_offset_domain_uses_own_period() {
        // cos(2πx/4) on [1, 5]: only a1 survives
        let pf = PiecewiseFunction::single(1.0, 5.0, |x| (PI * x / 2.0).cos()).unwrap();
        let series = compute_series(&pf, 5, 1000).unwrap();

        assert_eq!(series.period, 4.0);
        assert_eq!(series.domain_start, 1.0);
        assert_abs_diff_eq!(series.an.get(1).unwrap(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(series.an.get(2).unwrap(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(series.bn.get(1).unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_failed_samples_are_absorbed() {
        // 1/x blows up at the shared node x = 0; fail-to-zero keeps it finite
        let pf = PiecewiseFunction::single(-1.0, 1.0, |x| 1.0 / x).unwrap();
        let series = compute_series(&pf, 3, 1000).unwrap();

        assert!(series.a0.is_finite());
        assert!(series.bn.values().iter().all(|b| b.is_finite()));
    }

    #[test]
    fn test_zero_harmonics_rejected() {
        let pf = PiecewiseFunction::single(0.0, 1.0, |x| x).unwrap();
        assert!(matches!(
            compute_series(&pf, 0, 1000),
            Err(AnalysisError::InvalidResolution { .. })
        ));
    }

    // ==========================================================================
    // HARMONIC INDEXING TESTS
    // ==========================================================================

    #[test]
    fn test_harmonics_are_one_based() {
        let h: Harmonics = vec![0.5, 0.25].into_iter().collect();
        assert_eq!(h.get(0), None);
        assert_eq!(h.get(1), Some(0.5));
        assert_eq!(h.get(2), Some(0.25));
        assert_eq!(h.get(3), None);
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![(1, 0.5), (2, 0.25)]);
    }

    #[test]
    fn test_harmonics_serialize_as_list() {
        let h: Harmonics = vec![1.0, 2.0].into_iter().collect();
        assert_eq!(serde_json::to_string(&h).unwrap(), "[1.0,2.0]");
    }

    // ==========================================================================
    // RECONSTRUCTION TESTS
    // ==========================================================================

    #[test]
    fn test_partial_sum_recovers_smooth_signal() {
        let f = |x: f64| 1.0 + 2.0 * x.cos() - 0.5 * (3.0 * x).sin();
        let pf = PiecewiseFunction::single(-PI, PI, f).unwrap();
        let series = compute_series(&pf, 5, 1000).unwrap();

        let data = series.reconstruct(9, 5);
        assert_eq!(data.len(), 9);
        assert_eq!(data.x[0], -PI);
        for (x, y) in data.x.iter().zip(&data.y) {
            assert_abs_diff_eq!(*y, f(*x), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_partial_sum_zero_terms_is_mean() {
        let pf = PiecewiseFunction::single(0.0, 1.0, |x| x).unwrap();
        let series = compute_series(&pf, 4, 1000).unwrap();
        assert_abs_diff_eq!(series.partial_sum(0.3, 0), 0.5, epsilon = 1e-9);
    }
}
