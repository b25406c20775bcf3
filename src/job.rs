//! Wire types for the conversion job endpoints.
//!
//! The service speaks camelCase JSON; these structs map it onto Rust names.
//! Only [`JobStatus`] and [`JobStatusSnapshot`] are public; the submission
//! and error envelopes stay crate-private.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a remote conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    /// Any state this client does not know about; treated as still running.
    #[serde(other)]
    Unknown,
}

/// One response from `GET /jobs/{id}`. Fetched fresh on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusSnapshot {
    #[serde(default = "unknown_status")]
    pub status: JobStatus,
    /// Present once the job is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Present when the job failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn unknown_status() -> JobStatus {
    JobStatus::Unknown
}

/// Success body of `POST /convert`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    pub job_id: Option<String>,
}

/// Error envelope the service uses on 4xx/5xx.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// The service's `message` field, or the raw body when there is none.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_string())
}
