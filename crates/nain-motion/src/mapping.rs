use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("mapping needs at least one breakpoint")]
    Empty,

    #[error("{inputs} input breakpoints but {outputs} output values")]
    LengthMismatch { inputs: usize, outputs: usize },

    #[error("input breakpoint {index} is smaller than the one before it")]
    Unordered { index: usize },

    #[error("breakpoint {index} is not a finite number")]
    NonFinite { index: usize },
}

/// A piecewise-linear function: ordered input breakpoints paired with output
/// values, linearly interpolated between neighbours and clamped at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Breakpoints")]
pub struct PiecewiseLinear {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

/// Unchecked wire form; deserialization goes through [`PiecewiseLinear::new`].
#[derive(Deserialize)]
struct Breakpoints {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl TryFrom<Breakpoints> for PiecewiseLinear {
    type Error = MappingError;

    fn try_from(raw: Breakpoints) -> Result<Self, Self::Error> {
        PiecewiseLinear::new(&raw.inputs, &raw.outputs)
    }
}

impl PiecewiseLinear {
    pub fn new(inputs: &[f64], outputs: &[f64]) -> Result<Self, MappingError> {
        if inputs.is_empty() {
            return Err(MappingError::Empty);
        }
        if inputs.len() != outputs.len() {
            return Err(MappingError::LengthMismatch {
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        for (index, (i, o)) in inputs.iter().zip(outputs).enumerate() {
            if !i.is_finite() || !o.is_finite() {
                return Err(MappingError::NonFinite { index });
            }
        }
        if let Some(index) = (1..inputs.len()).find(|&i| inputs[i] < inputs[i - 1]) {
            return Err(MappingError::Unordered { index });
        }
        Ok(Self {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        })
    }

    /// A two-point mapping `[from_in, to_in] -> [from_out, to_out]`.
    pub fn between(from_in: f64, to_in: f64, from_out: f64, to_out: f64) -> Result<Self, MappingError> {
        Self::new(&[from_in, to_in], &[from_out, to_out])
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[f64] {
        &self.outputs
    }

    /// Evaluate the mapping. Coincident breakpoints resolve to the later output.
    pub fn map(&self, x: f64) -> f64 {
        let first = self.outputs[0];
        let last = self.outputs[self.outputs.len() - 1];
        if x.is_nan() || x < self.inputs[0] {
            return first;
        }
        if x >= self.inputs[self.inputs.len() - 1] {
            return last;
        }

        // First breakpoint strictly greater than x; x sits in [hi - 1, hi).
        let hi = self.inputs.partition_point(|&b| b <= x);
        let lo = hi - 1;
        let (a, b) = (self.inputs[lo], self.inputs[hi]);
        let span = b - a;
        if span == 0.0 {
            return self.outputs[hi];
        }
        let t = (x - a) / span;
        self.outputs[lo] + (self.outputs[hi] - self.outputs[lo]) * t
    }
}
