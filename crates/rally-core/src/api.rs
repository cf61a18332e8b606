//! Wire types for the analysis service.

use serde::{Deserialize, Serialize};

use crate::rally::Rally;

/// Processing state reported by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    /// Still being worked on; the client keeps polling.
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Body of a lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub action: &'static str,
    pub video_id: String,
}

impl AnalysisRequest {
    pub fn get_analysis(video_id: impl Into<String>) -> Self {
        Self {
            action: "get-analysis",
            video_id: video_id.into(),
        }
    }
}

/// Analysis result for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub video_id: String,
    pub status: AnalysisStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rallies: Option<Vec<Rally>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl AnalysisResponse {
    /// Rallies of a completed analysis, empty otherwise.
    pub fn rallies_or_empty(&self) -> &[Rally] {
        self.rallies.as_deref().unwrap_or_default()
    }

    /// Completed with a playable video.
    pub fn is_ready(&self) -> bool {
        self.status == AnalysisStatus::Completed && self.video_url.is_some()
    }
}

/// Failure of a lookup request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API request failed with status {0}")]
    Status(u16),
    #[error("invalid response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_completed_response() {
        let json = r#"{
            "videoId": "abc",
            "status": "completed",
            "videoUrl": "https://cdn.test/abc.mp4",
            "rallies": [{"rallyIndex": 1, "startTime": 1.0, "endTime": 4.5, "duration": 3.5}],
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let response: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, AnalysisStatus::Completed);
        assert!(response.is_ready());
        assert_eq!(response.rallies_or_empty().len(), 1);
        assert_eq!(response.updated_at, None);
    }

    #[test]
    fn test_decode_pending_response() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"videoId": "abc", "status": "pending"}"#).unwrap();
        assert!(response.status.is_in_progress());
        assert!(!response.is_ready());
        assert!(response.rallies_or_empty().is_empty());
    }

    #[test]
    fn test_terminal_statuses_stop_polling() {
        assert!(AnalysisStatus::Processing.is_in_progress());
        assert!(!AnalysisStatus::Completed.is_in_progress());
        assert!(!AnalysisStatus::Failed.is_in_progress());
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(AnalysisRequest::get_analysis("abc")).unwrap();
        assert_eq!(body["action"], "get-analysis");
        assert_eq!(body["videoId"], "abc");
    }
}
