//! Weighted two-model ensemble and verdict policy.
//!
//! Model B (the EfficientNet stand-in) carries the higher weight. The
//! uncertainty threshold is checked before the predicted class, so a
//! low-confidence cataract prediction still comes back Uncertain.

use std::sync::Arc;

use serde::Serialize;

use super::classifier::{ClassProbabilities, Classifier, ModelId};
use crate::models::Verdict;

/// Ensemble weights — model B is favored.
pub const MODEL_A_WEIGHT: f64 = 0.4;
pub const MODEL_B_WEIGHT: f64 = 0.6;

/// Below this combined confidence the verdict is Uncertain regardless of
/// the predicted class.
pub const UNCERTAINTY_THRESHOLD: f64 = 0.6;

/// Label reported to clients for the combined prediction.
pub const MODEL_LABEL: &str = "AI Analysis";

/// Outcome of one scoring call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub result: Verdict,
    pub confidence: f64,
    pub message: String,
}

/// Runs both ensemble members and combines their outputs.
#[derive(Clone)]
pub struct EnsembleScorer {
    classifier: Arc<dyn Classifier>,
}

impl EnsembleScorer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    /// Score an image reference. Identical input always yields an identical
    /// outcome; the two model passes run concurrently but are pure.
    pub async fn score(&self, image_ref: &str) -> DetectionOutcome {
        let (a, b) = tokio::join!(
            self.run_model(image_ref, ModelId::A),
            self.run_model(image_ref, ModelId::B),
        );
        combine(a, b)
    }

    async fn run_model(&self, image_ref: &str, model: ModelId) -> ClassProbabilities {
        let latency = self.classifier.latency(model);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.classifier.infer(image_ref, model)
    }
}

/// Weighted combination of two per-model probability pairs plus the verdict
/// policy. Pure; unit tests feed it probabilities directly.
pub fn combine(a: ClassProbabilities, b: ClassProbabilities) -> DetectionOutcome {
    let normal = MODEL_A_WEIGHT * a.normal + MODEL_B_WEIGHT * b.normal;
    let cataract = MODEL_A_WEIGHT * a.cataract + MODEL_B_WEIGHT * b.cataract;

    let confidence = normal.max(cataract);
    let cataract_predicted = cataract > normal;

    // Threshold check takes precedence over the predicted class
    let result = if confidence < UNCERTAINTY_THRESHOLD {
        Verdict::Uncertain
    } else if cataract_predicted {
        Verdict::Positive
    } else {
        Verdict::Negative
    };

    DetectionOutcome {
        result,
        confidence,
        message: verdict_message(result, confidence),
    }
}

/// Fixed explanation template per verdict; confidence rendered as a
/// one-decimal percentage for the decided verdicts.
pub fn verdict_message(result: Verdict, confidence: f64) -> String {
    let conf = format!("{:.1}", confidence * 100.0);
    match result {
        Verdict::Uncertain => {
            "The analysis shows uncertain results. This could be due to image quality, \
             lighting conditions, or borderline cases. We recommend consulting with an \
             ophthalmologist for a professional evaluation and consider retaking the \
             image with better lighting and focus."
                .to_string()
        }
        Verdict::Positive => format!(
            "Cataract detected with {conf}% confidence. The AI analysis has identified \
             potential cataract formation in the eye image. This requires immediate \
             attention from an ophthalmologist for proper diagnosis, staging, and \
             treatment planning. Early detection allows for better treatment outcomes."
        ),
        Verdict::Negative => format!(
            "No cataract detected with {conf}% confidence. The eye appears healthy \
             based on the analysis. However, this should not replace regular eye \
             examinations. Continue with routine eye care and consult your healthcare \
             provider if you experience any vision changes."
        ),
    }
}
