//! Closed-form segment shapes for job files
//!
//! Job files describe signals as a list of segments, each a shape from a fixed
//! catalogue. Shapes are plain data (serde), turned into evaluators here, so no
//! formula strings are ever parsed.
//!
//! ```json
//! [
//!   { "start": -3.14159, "end": 0.0, "shape": { "kind": "constant", "value": -1.0 } },
//!   { "start": 0.0, "end": 3.14159, "shape": { "kind": "polynomial", "coefficients": [0.0, 1.0] } }
//! ]
//! ```

use crate::error::{AnalysisError, EvaluationError};
use crate::piecewise::{PiecewiseFunction, Segment};
use serde::{Deserialize, Serialize};

fn one() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Constant {
        value: f64,
    },
    /// `c0 + c1·x + c2·x² + ...`
    Polynomial {
        coefficients: Vec<f64>,
    },
    /// `A·sin(ωx + φ)`
    Sine {
        #[serde(default = "one")]
        amplitude: f64,
        #[serde(default = "one")]
        angular_frequency: f64,
        #[serde(default)]
        phase: f64,
    },
    /// `A·cos(ωx + φ)`
    Cosine {
        #[serde(default = "one")]
        amplitude: f64,
        #[serde(default = "one")]
        angular_frequency: f64,
        #[serde(default)]
        phase: f64,
    },
    /// `A·e^{rate·x}`
    Exponential {
        #[serde(default = "one")]
        amplitude: f64,
        rate: f64,
    },
    /// `numerator / (x − pole)`, undefined at the pole
    Reciprocal {
        #[serde(default = "one")]
        numerator: f64,
        #[serde(default)]
        pole: f64,
    },
}

/// Horner evaluation, coefficients in ascending powers.
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| f64::mul_add(acc, x, c))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub start: f64,
    pub end: f64,
    pub shape: Shape,
}

impl SegmentSpec {
    pub fn to_segment(&self) -> Result<Segment, AnalysisError> {
        let (start, end) = (self.start, self.end);

        match self.shape.clone() {
            Shape::Constant { value } => Segment::new(start, end, move |_| value),
            Shape::Polynomial { coefficients } => {
                Segment::new(start, end, move |x| horner(&coefficients, x))
            }
            Shape::Sine {
                amplitude,
                angular_frequency,
                phase,
            } => Segment::new(start, end, move |x| {
                amplitude * (angular_frequency * x + phase).sin()
            }),
            Shape::Cosine {
                amplitude,
                angular_frequency,
                phase,
            } => Segment::new(start, end, move |x| {
                amplitude * (angular_frequency * x + phase).cos()
            }),
            Shape::Exponential { amplitude, rate } => {
                Segment::new(start, end, move |x| amplitude * (rate * x).exp())
            }
            Shape::Reciprocal { numerator, pole } => Segment::fallible(start, end, move |x| {
                let denominator = x - pole;
                if denominator == 0.0 {
                    Err(EvaluationError::new(x, "division by zero at pole"))
                } else {
                    Ok(numerator / denominator)
                }
            }),
        }
    }
}

/// Validate and assemble a piecewise function from segment specs.
pub fn build_function(specs: &[SegmentSpec]) -> Result<PiecewiseFunction, AnalysisError> {
    let segments = specs
        .iter()
        .map(SegmentSpec::to_segment)
        .collect::<Result<Vec<_>, _>>()?;
    PiecewiseFunction::new(segments)
}
