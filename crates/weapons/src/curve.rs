//! Distance falloff curve.

use serde::{Deserialize, Serialize};

/// Piecewise-linear curve over normalised distance (`distance / range`).
///
/// Keys are `(t, multiplier)` pairs. Evaluation clamps to the first and
/// last key outside their span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CurveKeys")]
pub struct FalloffCurve {
    keys: Vec<(f32, f32)>,
}

/// Serialized form; loaded keys go through [`FalloffCurve::new`].
#[derive(Deserialize)]
struct CurveKeys {
    keys: Vec<(f32, f32)>,
}

impl From<CurveKeys> for FalloffCurve {
    fn from(data: CurveKeys) -> Self {
        Self::new(data.keys)
    }
}

impl Default for FalloffCurve {
    /// Full damage at the muzzle, half at maximum range.
    fn default() -> Self {
        Self::new(vec![(0.0, 1.0), (1.0, 0.5)])
    }
}

impl FalloffCurve {
    /// Build a curve; keys are sorted by `t`.
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    /// A curve that always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![(0.0, value)])
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluate the multiplier at `t`. An empty curve evaluates to 1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.0 {
                let span = b.0 - a.0;
                if span <= f32::EPSILON {
                    return b.1;
                }
                let s = (t - a.0) / span;
                return a.1 + (b.1 - a.1) * s;
            }
        }
        last.1
    }
}
