//! Numerical integration of scalar functions
//!
//! Three rules, each in two flavours:
//!
//! - `simpson`, `trapezoid`, `adaptive_simpson` take an infallible `Fn(f64) -> f64`.
//! - `try_simpson`, `try_trapezoid`, `try_adaptive_simpson` take a fallible
//!   `Fn(f64) -> Result<f64, E>` and stop at the first failing sample, handing
//!   the error back unchanged. Quadrature never swallows errors; callers that
//!   want resilience wrap their integrand first (see
//!   [`PiecewiseFunction::evaluate_at`](crate::PiecewiseFunction::evaluate_at)).
//!
//! # Conventions
//!
//! All rules follow the Riemann sign convention: integrating over `[b, a]`
//! gives the negation of integrating over `[a, b]`, and a degenerate interval
//! (`a == b`) integrates to exactly `0.0`. Convolution bounds can invert, so
//! this is relied upon rather than rejected.
//!
//! ```text
//! Rule              | Order | Used by
//! ------------------|-------|-----------------------------------------
//! Composite Simpson | h^4   | series, transform, convolution, energy
//! Trapezoid         | h^2   | Parseval frequency-domain energy
//! Adaptive Simpson  | tol   | callers with unknown smoothness
//! ```

use std::convert::Infallible;

/// Default number of sub-intervals for the composite rules.
pub const DEFAULT_STEPS: usize = 1000;

/// Default absolute tolerance for [`adaptive_simpson`].
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Recursion cap for [`adaptive_simpson`] on integrands that never converge.
pub const MAX_ADAPTIVE_DEPTH: usize = 50;

/// Composite Simpson needs an even number of sub-intervals, at least two.
fn even_steps(steps: usize) -> usize {
    let steps = steps.max(2);
    steps + steps % 2
}

fn into_value(result: Result<f64, Infallible>) -> f64 {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Composite Simpson's rule with `steps` sub-intervals (rounded up to even).
pub fn simpson<F>(f: F, a: f64, b: f64, steps: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    into_value(try_simpson(|x| Ok(f(x)), a, b, steps))
}

/// Composite Simpson's rule over a fallible integrand.
///
/// Weights are `1, 4, 2, 4, ..., 2, 4, 1` scaled by `h / 3` where
/// `h = (b - a) / steps` keeps its sign.
pub fn try_simpson<F, E>(f: F, a: f64, b: f64, steps: usize) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    if a == b {
        return Ok(0.0);
    }

    let n = even_steps(steps);
    let h = (b - a) / n as f64;
    let mut sum = f(a)? + f(b)?;

    for i in 1..n {
        let x = a + i as f64 * h;
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(x)?;
    }

    Ok(sum * h / 3.0)
}

/// Composite trapezoid rule with `steps` sub-intervals (at least one).
pub fn trapezoid<F>(f: F, a: f64, b: f64, steps: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    into_value(try_trapezoid(|x| Ok(f(x)), a, b, steps))
}

/// Composite trapezoid rule over a fallible integrand.
pub fn try_trapezoid<F, E>(f: F, a: f64, b: f64, steps: usize) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    if a == b {
        return Ok(0.0);
    }

    let n = steps.max(1);
    let h = (b - a) / n as f64;
    let mut sum = 0.5 * (f(a)? + f(b)?);

    for i in 1..n {
        sum += f(a + i as f64 * h)?;
    }

    Ok(sum * h)
}

/// Adaptive Simpson integration to an absolute `tolerance`.
///
/// A non-positive or non-finite tolerance falls back to [`DEFAULT_TOLERANCE`].
pub fn adaptive_simpson<F>(f: F, a: f64, b: f64, tolerance: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    into_value(try_adaptive_simpson(|x| Ok(f(x)), a, b, tolerance))
}

/// Adaptive Simpson integration over a fallible integrand.
pub fn try_adaptive_simpson<F, E>(f: F, a: f64, b: f64, tolerance: f64) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    if a == b {
        return Ok(0.0);
    }

    let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
        tolerance
    } else {
        DEFAULT_TOLERANCE
    };

    let fa = f(a)?;
    let fb = f(b)?;
    let fm = f(0.5 * (a + b))?;
    let whole = panel(a, b, fa, fm, fb);

    refine(&f, Panel { a, b, fa, fm, fb, whole }, tolerance, MAX_ADAPTIVE_DEPTH)
}

/// One Simpson panel with its three samples cached.
struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

fn panel(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

fn refine<F, E>(f: &F, p: Panel, tolerance: f64, depth: usize) -> Result<f64, E>
where
    F: Fn(f64) -> Result<f64, E>,
{
    let m = 0.5 * (p.a + p.b);
    let left_mid = 0.5 * (p.a + m);
    let right_mid = 0.5 * (m + p.b);
    let f_left_mid = f(left_mid)?;
    let f_right_mid = f(right_mid)?;

    let left = panel(p.a, m, p.fa, f_left_mid, p.fm);
    let right = panel(m, p.b, p.fm, f_right_mid, p.fb);
    let delta = left + right - p.whole;

    if delta.abs() <= 15.0 * tolerance {
        return Ok(left + right + delta / 15.0);
    }

    // Interval can no longer be split, or the integrand refuses to converge
    if depth == 0 || left_mid == p.a || right_mid == p.b {
        log::trace!(
            "adaptive simpson stopped on [{}, {}] with error estimate {:e}",
            p.a,
            p.b,
            delta.abs() / 15.0
        );
        return Ok(left + right + delta / 15.0);
    }

    let half_tolerance = tolerance / 2.0;
    let left_panel = Panel {
        a: p.a,
        b: m,
        fa: p.fa,
        fm: f_left_mid,
        fb: p.fm,
        whole: left,
    };
    let right_panel = Panel {
        a: m,
        b: p.b,
        fa: p.fm,
        fm: f_right_mid,
        fb: p.fb,
        whole: right,
    };

    Ok(refine(f, left_panel, half_tolerance, depth - 1)?
        + refine(f, right_panel, half_tolerance, depth - 1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvaluationError;
    use crate::piecewise::Segment;
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::f64::consts::PI;

    // ==========================================================================
    // SIMPSON'S RULE TESTS
    // ==========================================================================
    //
    // Composite Simpson fits a parabola through every pair of sub-intervals.
    // It is exact for polynomials up to degree 3, so x^0..x^3 must match the
    // closed-form antiderivative to rounding error for any even step count.
    // ==========================================================================

    #[test]
    fn test_simpson_degenerate_interval_is_zero() {
        assert_eq!(simpson(|x| x.exp(), 1.5, 1.5, 1000), 0.0);
        assert_eq!(simpson(|_| f64::NAN, -2.0, -2.0, 10), 0.0);
    }

    #[test]
    fn test_simpson_sign_convention() {
        let f = |x: f64| x.sin() + 0.3 * x * x;
        let forward = simpson(f, -1.0, 2.5, 1000);
        let backward = simpson(f, 2.5, -1.0, 1000);
        assert_abs_diff_eq!(forward, -backward, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_polynomial_exactness() {
        let (a, b) = (-1.25_f64, 2.0_f64);
        for k in 0..=3 {
            let exact = (b.powi(k + 1) - a.powi(k + 1)) / (k + 1) as f64;
            for steps in [2, 4, 10, 1000] {
                let approx = simpson(|x| x.powi(k), a, b, steps);
                assert_abs_diff_eq!(approx, exact, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_simpson_odd_steps_rounded_up() {
        // 3 steps becomes 4; cubic stays exact
        let approx = simpson(|x| x * x * x, 0.0, 2.0, 3);
        assert_abs_diff_eq!(approx, 4.0, epsilon = 1e-12);

        // Zero steps becomes 2
        let approx = simpson(|x| x * x, 0.0, 3.0, 0);
        assert_abs_diff_eq!(approx, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_simpson_sample_count() {
        let calls = Cell::new(0usize);
        simpson(
            |x| {
                calls.set(calls.get() + 1);
                x
            },
            0.0,
            1.0,
            7,
        );
        // 8 sub-intervals -> 9 nodes
        assert_eq!(calls.get(), 9);
    }

    #[test]
    fn test_simpson_smooth_function() {
        let approx = simpson(|x| x.sin(), 0.0, PI, 1000);
        assert_abs_diff_eq!(approx, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_try_simpson_propagates_errors() {
        let result: Result<f64, String> = try_simpson(
            |x| {
                if x > 0.5 {
                    Err(format!("bad sample at {}", x))
                } else {
                    Ok(x)
                }
            },
            0.0,
            1.0,
            10,
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().starts_with("bad sample"));
    }

    #[test]
    fn test_try_simpson_degenerate_skips_evaluation() {
        let result: Result<f64, &str> = try_simpson(|_| Err("never called"), 3.0, 3.0, 10);
        assert_eq!(result, Ok(0.0));
    }

    // ==========================================================================
    // TRAPEZOID RULE TESTS
    // ==========================================================================

    #[test]
    fn test_trapezoid_linear_exact() {
        let approx = trapezoid(|x| 3.0 * x - 1.0, -2.0, 4.0, 5);
        // Antiderivative 1.5x^2 - x: (24 - 4) - (6 + 2) = 12
        assert_abs_diff_eq!(approx, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoid_contracts() {
        assert_eq!(trapezoid(|x| x * x, 2.0, 2.0, 100), 0.0);
        let forward = trapezoid(|x| x.cos(), 0.0, 1.0, 100);
        let backward = trapezoid(|x| x.cos(), 1.0, 0.0, 100);
        assert_abs_diff_eq!(forward, -backward, epsilon = 1e-12);
        assert_abs_diff_eq!(forward, 1.0_f64.sin(), epsilon = 1e-4);
    }

    #[test]
    fn test_try_trapezoid_propagates_errors() {
        let result: Result<f64, &str> = try_trapezoid(|_| Err("boom"), 0.0, 1.0, 4);
        assert_eq!(result, Err("boom"));
    }

    // ==========================================================================
    // ADAPTIVE SIMPSON TESTS
    // ==========================================================================
    //
    // The adaptive rule bisects until the two-half estimate agrees with the
    // whole-interval estimate, then applies the Richardson correction.
    // ==========================================================================

    #[test]
    fn test_adaptive_simpson_smooth() {
        let approx = adaptive_simpson(|x| x.sin(), 0.0, PI, 1e-8);
        assert_abs_diff_eq!(approx, 2.0, epsilon = 1e-7);
    }

    #[test]
    fn test_adaptive_simpson_endpoint_singularity() {
        // sqrt has an unbounded derivative at 0
        let approx = adaptive_simpson(|x| x.sqrt(), 0.0, 1.0, 1e-8);
        assert_abs_diff_eq!(approx, 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_adaptive_simpson_contracts() {
        assert_eq!(adaptive_simpson(|x| x, 5.0, 5.0, 1e-6), 0.0);
        let forward = adaptive_simpson(|x| x.exp(), 0.0, 1.0, 1e-9);
        let backward = adaptive_simpson(|x| x.exp(), 1.0, 0.0, 1e-9);
        assert_abs_diff_eq!(forward, -backward, epsilon = 1e-9);
        assert_abs_diff_eq!(forward, 1.0_f64.exp() - 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_adaptive_simpson_bad_tolerance_falls_back() {
        let approx = adaptive_simpson(|x| x * x, 0.0, 1.0, -1.0);
        assert_abs_diff_eq!(approx, 1.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_try_adaptive_simpson_propagates_errors() {
        // Initial samples 0, 0.5 and 1 succeed; the first refinement hits 0.75
        let calls = Cell::new(0usize);
        let result = try_adaptive_simpson(
            |x| {
                calls.set(calls.get() + 1);
                if x > 0.7 && x < 0.9 {
                    Err(EvaluationError::new(x, "pole"))
                } else {
                    Ok(x)
                }
            },
            0.0,
            1.0,
            1e-8,
        );

        let err = result.unwrap_err();
        assert_eq!(err.x, 0.75);
        assert_eq!(err.reason, "pole");
        assert!(calls.get() > 3);
    }

    #[test]
    fn test_try_adaptive_simpson_error_at_endpoint() {
        let result = try_adaptive_simpson(
            |x| {
                if x > 0.7 {
                    Err(EvaluationError::new(x, "pole"))
                } else {
                    Ok(x)
                }
            },
            0.0,
            1.0,
            1e-8,
        );
        assert_eq!(result, Err(EvaluationError::new(1.0, "pole")));
    }

    #[test]
    fn test_try_rules_pass_segment_errors_through() {
        let segment = Segment::fallible(-1.0, 1.0, |x| {
            if x == 0.0 {
                Err(EvaluationError::new(x, "division by zero"))
            } else {
                Ok(1.0 / x)
            }
        })
        .unwrap();

        // Symmetric grids land on x = 0
        let simpson_err = try_simpson(|x| segment.evaluate(x), -1.0, 1.0, 10).unwrap_err();
        assert_eq!(simpson_err, EvaluationError::new(0.0, "division by zero"));

        let adaptive_err =
            try_adaptive_simpson(|x| segment.evaluate(x), -1.0, 1.0, 1e-6).unwrap_err();
        assert_eq!(adaptive_err.x, 0.0);

        // Fail-to-zero wrapper makes the same integral succeed
        let total = simpson(|x| segment.evaluate_or_zero(x), -1.0, 1.0, 10);
        assert!(total.is_finite());
    }

    #[test]
    fn test_adaptive_simpson_terminates_on_jump() {
        // Step discontinuity inside the interval never converges at the jump,
        // only the depth cap stops the recursion there
        let approx = adaptive_simpson(|x| if x < 0.3 { 0.0 } else { 1.0 }, 0.0, 1.0, 1e-10);
        assert_abs_diff_eq!(approx, 0.7, epsilon = 1e-6);
    }
}
