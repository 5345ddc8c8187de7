//! Upstream image probe.
//!
//! The scorer never decodes pixels (the classifier is hash-seeded), but the
//! pipeline still verifies the image reference is a well-formed URL and
//! that the upstream actually serves it, so unreachable images fail the
//! analysis instead of silently scoring a dead link.

use reqwest::Url;

use super::DetectionError;

/// Validate the shape of an image URL.
pub fn parse_image_url(image_url: &str) -> Result<Url, DetectionError> {
    if image_url.trim().is_empty() {
        return Err(DetectionError::InvalidImageUrl(
            "Image URL is required".into(),
        ));
    }
    Url::parse(image_url)
        .map_err(|_| DetectionError::InvalidImageUrl("Invalid image URL provided".into()))
}

/// Fetch the image once and discard the body. Any transport error or
/// non-success status surfaces as a retryable upstream failure.
pub async fn probe_image(client: &reqwest::Client, url: Url) -> Result<(), DetectionError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(DetectionError::UpstreamFetch)?;

    response
        .error_for_status()
        .map_err(DetectionError::UpstreamFetch)?;

    Ok(())
}
