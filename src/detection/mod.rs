//! Detection pipeline: image probe → two simulated model passes →
//! weighted ensemble → verdict.
//!
//! Everything downstream of the probe is a pure function of the image
//! reference, which is what makes persisted results reproducible.

pub mod classifier;
pub mod ensemble;
pub mod fetch;
pub mod hash;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub use classifier::{ClassProbabilities, Classifier, ModelId, SimulatedClassifier};
pub use ensemble::{DetectionOutcome, EnsembleScorer, MODEL_LABEL, UNCERTAINTY_THRESHOLD};
pub use hash::image_hash;

/// Failures of one detection call. Validation is terminal; fetch and
/// timeout failures are retryable by the caller.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("{0}")]
    InvalidImageUrl(String),

    #[error("Failed to fetch image")]
    UpstreamFetch(#[source] reqwest::Error),

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),
}

/// Full scoring pipeline with its collaborators wired in.
#[derive(Clone)]
pub struct Detector {
    scorer: EnsembleScorer,
    http: reqwest::Client,
    probe_images: bool,
    timeout: Duration,
}

impl Detector {
    pub fn new(classifier: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            scorer: EnsembleScorer::new(classifier),
            http: reqwest::Client::new(),
            probe_images: true,
            timeout,
        }
    }

    /// Skip the upstream probe. Used by tests and offline deployments where
    /// image references are storage keys rather than fetchable URLs.
    pub fn without_probe(mut self) -> Self {
        self.probe_images = false;
        self
    }

    /// Validate, probe and score an image reference, bounded by the overall
    /// timeout. No partial state is written anywhere — abandoning the call
    /// has no side effects.
    pub async fn detect(&self, image_url: &str) -> Result<DetectionOutcome, DetectionError> {
        let url = fetch::parse_image_url(image_url)?;

        let pipeline = async {
            if self.probe_images {
                fetch::probe_image(&self.http, url).await?;
            }
            Ok(self.scorer.score(image_url).await)
        };

        match tokio::time::timeout(self.timeout, pipeline).await {
            Ok(result) => result,
            Err(_) => Err(DetectionError::Timeout(self.timeout)),
        }
    }
}
