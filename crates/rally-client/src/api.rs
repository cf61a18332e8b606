//! Analysis service client.

use gloo::net::http::Request;
use rally_core::api::ApiError;
use rally_core::{AnalysisRequest, AnalysisResponse, ApiConfig};

/// Looks up the analysis for `video_id`.
pub async fn fetch_analysis(
    config: &ApiConfig,
    video_id: &str,
) -> Result<AnalysisResponse, ApiError> {
    let mut request = Request::post(&config.url);
    if let Some(key) = &config.api_key {
        request = request.header("Authorization", &format!("Bearer {key}"));
    }

    let response = request
        .json(&AnalysisRequest::get_analysis(video_id))
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }

    response
        .json::<AnalysisResponse>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
