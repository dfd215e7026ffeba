use serde::Serialize;

use crate::config::Credentials;
use crate::dimensions::Dimensions;

#[derive(Debug, thiserror::Error)]
pub enum ImageUrlError {
    #[error("endpoint `{0}` is not an http(s) URL")]
    InvalidEndpoint(String),
    #[error("media id is empty")]
    EmptyMediaId,
    #[error("failed to encode query: {0}")]
    Query(#[from] serde_qs::Error),
}

#[derive(Debug, Serialize)]
struct MediaQuery<'a> {
    public_key: &'a str,
    viewport_width: u32,
    max_width: u32,
}

/// Builds `{endpoint}/projects/{project}/media/{media}?public_key=..&viewport_width=..&max_width=..`.
///
/// Returns `Ok(None)` until the viewport has been measured. An explicit,
/// non-zero `max_width` wins over the measured element width. Project and
/// media ids are percent-encoded as single path segments.
pub fn build_image_url(
    credentials: &Credentials,
    media_id: &str,
    dimensions: Dimensions,
    max_width: Option<u32>,
) -> Result<Option<String>, ImageUrlError> {
    if !dimensions.is_measured() {
        return Ok(None);
    }

    let endpoint = credentials.endpoint.trim_end_matches('/');
    if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
        return Err(ImageUrlError::InvalidEndpoint(endpoint.to_string()));
    }
    if media_id.is_empty() {
        return Err(ImageUrlError::EmptyMediaId);
    }

    let query = serde_qs::to_string(&MediaQuery {
        public_key: &credentials.public_key,
        viewport_width: dimensions.viewport_width,
        max_width: max_width
            .filter(|w| *w > 0)
            .unwrap_or(dimensions.element_width),
    })?;

    let project_id = urlencoding::encode(&credentials.project_id);
    let media_id = urlencoding::encode(media_id);

    Ok(Some(format!(
        "{endpoint}/projects/{project_id}/media/{media_id}?{query}"
    )))
}
