//! Typed HTTP client for the Notes API.
//!
//! The API is read-only and owned by the analysis backend; this client only
//! consumes it. One method per endpoint, each returning `Result<_, ApiError>`
//! so callers decide how to degrade.

use crate::models::{
    AnswerRecord, AnswersIndex, LatestVersionResponse, Note, QuestionsResponse, VersionEntry,
    VersionsIndex,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

const REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout)
    Request(String),
    /// The server answered with a non-success status
    Status { url: String, status: u16 },
    /// The body did not match the expected shape
    Decode(String),
    /// The response was well-formed but carried nothing usable
    Empty(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Status { url, status } => write!(f, "HTTP {} from {}", status, url),
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
            ApiError::Empty(what) => write!(f, "No data in response: {}", what),
        }
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct NotesApi {
    base_url: String,
    client: reqwest::Client,
}

impl NotesApi {
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[Api] Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("{}: {}", url, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }

    /// GET /notes
    pub async fn notes(&self) -> Result<Vec<Note>, ApiError> {
        self.get_json("/notes").await
    }

    /// GET /answers_index
    pub async fn answers_index(&self) -> Result<AnswersIndex, ApiError> {
        let ids: Vec<String> = self.get_json("/answers_index").await?;
        Ok(ids.into_iter().collect())
    }

    /// GET /note_versions_index
    pub async fn note_versions_index(&self) -> Result<VersionsIndex, ApiError> {
        self.get_json("/note_versions_index").await
    }

    /// GET /question_versions
    pub async fn question_versions(&self) -> Result<Vec<String>, ApiError> {
        let entries: Vec<VersionEntry> = self.get_json("/question_versions").await?;
        Ok(entries.into_iter().map(|e| e.version).collect())
    }

    /// GET /latest_question_version. `None` when the backend knows no versions.
    pub async fn latest_question_version(&self) -> Result<Option<String>, ApiError> {
        let latest: LatestVersionResponse = self.get_json("/latest_question_version").await?;
        Ok(latest.version.filter(|v| !v.trim().is_empty()))
    }

    /// GET /questions/{version}
    pub async fn questions(&self, version: &str) -> Result<Vec<String>, ApiError> {
        let path = format!("/questions/{}", urlencoding::encode(version));
        let resp: QuestionsResponse = self.get_json(&path).await?;
        Ok(resp.questions)
    }

    /// GET /answers/{note_id}
    pub async fn answers(&self, note_id: &str) -> Result<Vec<AnswerRecord>, ApiError> {
        let path = format!("/answers/{}", urlencoding::encode(note_id));
        self.get_json(&path).await
    }
}
