//! Classifier seam and the deterministic stand-in implementation.
//!
//! `SimulatedClassifier` is explicitly NOT a trained model: it seeds a
//! lookup table from the image hash so that the same image reference always
//! produces the same probabilities. A real inference backend can replace it
//! behind the `Classifier` trait without touching the ensemble logic.

use std::time::Duration;

use super::hash::image_hash;

/// The two members of the scoring ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelId {
    /// Custom CNN stand-in.
    A,
    /// EfficientNet stand-in; carries the higher ensemble weight.
    B,
}

/// Two-class probability pair. Components sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassProbabilities {
    /// P(normal eye)
    pub normal: f64,
    /// P(cataract)
    pub cataract: f64,
}

impl ClassProbabilities {
    pub fn confidence(&self) -> f64 {
        self.normal.max(self.cataract)
    }
}

/// Scoring backend for one ensemble member.
///
/// Implementations must be pure with respect to `image_ref`: the persisted
/// verdict invariant (same reference, same result) depends on it.
pub trait Classifier: Send + Sync {
    fn infer(&self, image_ref: &str, model: ModelId) -> ClassProbabilities;

    /// Emulated inference cost for this model. Zero means no delay; the
    /// scorer sleeps this long before calling `infer`.
    fn latency(&self, model: ModelId) -> Duration {
        let _ = model;
        Duration::ZERO
    }
}

/// Hash-seeded deterministic stub for both ensemble members.
#[derive(Debug, Clone, Default)]
pub struct SimulatedClassifier {
    model_a_latency: Duration,
    model_b_latency: Duration,
}

impl SimulatedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emulate real inference cost. Model A waits `base`, model B waits
    /// 4/3 of it — the original ratio of 1500ms to 2000ms.
    pub fn with_latency(base: Duration) -> Self {
        Self {
            model_a_latency: base,
            model_b_latency: base * 4 / 3,
        }
    }
}

impl Classifier for SimulatedClassifier {
    fn infer(&self, image_ref: &str, model: ModelId) -> ClassProbabilities {
        let seed = u64::from(image_hash(image_ref)) % 1_000_000;

        let offset = match model {
            ModelId::A => 123,
            ModelId::B => 789,
        };
        let r = ((seed + offset) % 1000) as f64 / 1000.0;

        // Fixed per-model lookup tables; thresholds differ per model.
        let (normal, cataract) = match model {
            ModelId::A => {
                if r < 0.3 {
                    (0.15, 0.85)
                } else if r < 0.7 {
                    (0.88, 0.12)
                } else {
                    (0.45, 0.55)
                }
            }
            ModelId::B => {
                if r < 0.25 {
                    (0.08, 0.92)
                } else if r < 0.75 {
                    (0.91, 0.09)
                } else {
                    (0.35, 0.65)
                }
            }
        };

        ClassProbabilities { normal, cataract }
    }

    fn latency(&self, model: ModelId) -> Duration {
        match model {
            ModelId::A => self.model_a_latency,
            ModelId::B => self.model_b_latency,
        }
    }
}
