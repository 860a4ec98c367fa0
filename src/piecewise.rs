//! Piecewise functions over contiguous finite domains
//!
//! A [`PiecewiseFunction`] is an ordered list of [`Segment`]s, each carrying
//! its own evaluator over `[domain_start, domain_end]`. Neighbouring segments
//! must share a boundary: the *domain* is continuous even when the *value*
//! jumps (a square wave is two constant segments meeting at 0).
//!
//! # Fail-to-zero evaluation
//!
//! Evaluators come from outside (an expression compiler, a closed-form
//! shape, a test closure) and may fail at isolated points, e.g. `1/x` at 0.
//! [`PiecewiseFunction::evaluate_at`] and [`Segment::evaluate_or_zero`]
//! substitute `0.0` for a failed or non-finite sample so a single bad point
//! cannot abort a 1000-step integration.

use crate::error::{AnalysisError, EvaluationError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Tolerance used when comparing floating segment boundaries.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Shared, thread-safe evaluator for one segment.
pub type Evaluator = Arc<dyn Fn(f64) -> Result<f64, EvaluationError> + Send + Sync>;

/// Dense samples of a function, ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionData {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl FunctionData {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// `points` evenly spaced values covering `[start, end]` inclusive.
///
/// Fewer than two points collapse to just `start`.
pub(crate) fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| if i == points - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// One piece of a piecewise function.
#[derive(Clone)]
pub struct Segment {
    evaluator: Evaluator,
    domain_start: f64,
    domain_end: f64,
}

impl Segment {
    /// Segment backed by an infallible function.
    pub fn new<F>(domain_start: f64, domain_end: f64, f: F) -> Result<Self, AnalysisError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::fallible(domain_start, domain_end, move |x| Ok(f(x)))
    }

    /// Segment backed by a function that may fail at isolated points.
    pub fn fallible<F>(domain_start: f64, domain_end: f64, f: F) -> Result<Self, AnalysisError>
    where
        F: Fn(f64) -> Result<f64, EvaluationError> + Send + Sync + 'static,
    {
        if !domain_start.is_finite() || !domain_end.is_finite() {
            return Err(AnalysisError::InvalidDomain(format!(
                "segment bounds must be finite, got [{}, {}]",
                domain_start, domain_end
            )));
        }
        if domain_start >= domain_end {
            return Err(AnalysisError::InvalidDomain(format!(
                "segment start {} must be below its end {}",
                domain_start, domain_end
            )));
        }

        Ok(Self {
            evaluator: Arc::new(f),
            domain_start,
            domain_end,
        })
    }

    pub fn domain_start(&self) -> f64 {
        self.domain_start
    }

    pub fn domain_end(&self) -> f64 {
        self.domain_end
    }

    pub fn width(&self) -> f64 {
        self.domain_end - self.domain_start
    }

    /// Whether `x` lies in the segment, allowing [`BOUNDARY_EPSILON`] slack.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.domain_start - BOUNDARY_EPSILON && x <= self.domain_end + BOUNDARY_EPSILON
    }

    /// Raw evaluation, errors included.
    pub fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        (self.evaluator)(x)
    }

    /// Evaluation with failures and non-finite results replaced by zero.
    pub fn evaluate_or_zero(&self, x: f64) -> f64 {
        match self.evaluate(x) {
            Ok(value) if value.is_finite() => value,
            _ => 0.0,
        }
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("domain_start", &self.domain_start)
            .field("domain_end", &self.domain_end)
            .finish_non_exhaustive()
    }
}

/// Ordered, contiguous, non-empty sequence of segments.
#[derive(Debug, Clone)]
pub struct PiecewiseFunction {
    segments: Vec<Segment>,
}

impl PiecewiseFunction {
    /// Validate and assemble segments, sorting them by start.
    ///
    /// Fails with [`AnalysisError::InvalidDomain`] for an empty list and
    /// [`AnalysisError::DiscontinuousDomain`] for any gap or overlap between
    /// neighbours.
    pub fn new(mut segments: Vec<Segment>) -> Result<Self, AnalysisError> {
        if segments.is_empty() {
            return Err(AnalysisError::InvalidDomain(
                "a piecewise function needs at least one segment".to_string(),
            ));
        }

        segments.sort_by(|a, b| a.domain_start.total_cmp(&b.domain_start));

        for (index, pair) in segments.windows(2).enumerate() {
            let end = pair[0].domain_end;
            let start = pair[1].domain_start;
            if (end - start).abs() > BOUNDARY_EPSILON {
                return Err(AnalysisError::DiscontinuousDomain { index, end, start });
            }
        }

        let function = Self { segments };
        let period = function.period();
        if period <= 0.0 || !period.is_finite() {
            return Err(AnalysisError::InvalidPeriod(period));
        }

        Ok(function)
    }

    /// Single-segment convenience constructor.
    pub fn single<F>(domain_start: f64, domain_end: f64, f: F) -> Result<Self, AnalysisError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(vec![Segment::new(domain_start, domain_end, f)?])
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn domain_start(&self) -> f64 {
        self.segments[0].domain_start
    }

    pub fn domain_end(&self) -> f64 {
        self.segments[self.segments.len() - 1].domain_end
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.domain_start(), self.domain_end())
    }

    /// Total domain span, the fundamental period for series expansion.
    pub fn period(&self) -> f64 {
        self.domain_end() - self.domain_start()
    }

    /// Value at `x`, zero outside the domain or where evaluation fails.
    ///
    /// On a shared boundary the left segment wins.
    pub fn evaluate_at(&self, x: f64) -> f64 {
        self.segments
            .iter()
            .find(|segment| segment.contains(x))
            .map_or(0.0, |segment| segment.evaluate_or_zero(x))
    }

    /// `points` uniform samples over the whole domain.
    pub fn sample(&self, points: usize) -> FunctionData {
        let x = linspace(self.domain_start(), self.domain_end(), points);
        let y = x.iter().map(|&x| self.evaluate_at(x)).collect();
        FunctionData { x, y }
    }
}
