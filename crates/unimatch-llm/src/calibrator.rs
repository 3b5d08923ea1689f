//! Logistic recalibration of raw model probabilities.

use unimatch_config::CalibratorParams;

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
pub struct Calibrator {
    params: Option<CalibratorParams>,
}

impl Calibrator {
    pub fn new(params: Option<CalibratorParams>) -> Self {
        Self { params }
    }

    pub fn loaded(&self) -> bool {
        self.params.is_some()
    }

    /// Maps `p` through `sigmoid(a * logit(p) + b)`, or returns it unchanged when unloaded.
    pub fn apply(&self, p: f64) -> f64 {
        let Some(CalibratorParams { a, b }) = self.params else {
            return p;
        };
        let p = p.clamp(EPSILON, 1.0 - EPSILON);
        let logit = (p / (1.0 - p)).ln();
        1.0 / (1.0 + (-(a * logit + b)).exp())
    }
}
