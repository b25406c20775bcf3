//! Error types for the html2pdf-client library.
//!
//! A single enum, [`Html2PdfError`], covers every failure. Variants are
//! fine-grained so messages carry useful context (HTTP status, job id, path),
//! and [`Html2PdfError::kind`] folds them into a small set of categories for
//! callers that only need to branch on the broad failure class:
//!
//! * [`ErrorKind::Configuration`]: missing API key / webhook secret, bad base URL
//! * [`ErrorKind::InvalidRequest`]: nothing to convert
//! * [`ErrorKind::Conversion`]: the service rejected or failed the job
//! * [`ErrorKind::Timeout`]: polling deadline exceeded
//! * [`ErrorKind::Signature`] / [`ErrorKind::Payload`]: webhook verification
//! * [`ErrorKind::Transport`] / [`ErrorKind::Io`]: network or local disk

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Html2PdfError> = std::result::Result<T, E>;

/// All errors returned by the html2pdf-client library.
#[derive(Debug, Error)]
pub enum Html2PdfError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No API key (or an empty one) was supplied.
    #[error("Missing apiKey\nSet it with ClientConfig::builder().api_key(..) or HTML2PDF_API_KEY.")]
    MissingApiKey,

    /// `verify_webhook` was called on a client built without a webhook secret.
    #[error("Missing webhookSecret in client configuration")]
    MissingWebhookSecret,

    /// Any other configuration problem (unparseable base URL, bad header value).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Request errors ────────────────────────────────────────────────────
    /// The request has no html, url, or file to convert.
    #[error("You must provide html, url, or filePath")]
    NoSource,

    /// The file to upload does not exist.
    #[error("No file to send for conversion: '{path}' not found")]
    FileNotFound { path: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// `POST /convert` answered with an HTTP error status.
    #[error("PDF conversion failed (status: {status}): {message}")]
    SubmissionFailed { status: u16, message: String },

    /// `POST /convert` succeeded but the response carried no job id.
    #[error("Failed to create conversion job")]
    MissingJobId,

    /// `GET /jobs/{id}` answered with an HTTP error status.
    #[error("PDF job status check failed for '{job_id}' (status: {status}): {message}")]
    StatusCheckFailed {
        job_id: String,
        status: u16,
        message: String,
    },

    /// The service reported the job as failed. Terminal.
    #[error("PDF conversion failed for job '{job_id}': {message}")]
    JobFailed { job_id: String, message: String },

    /// The service returned a download URL that does not parse.
    #[error("Invalid download URL '{url}' returned for job '{job_id}'")]
    InvalidDownloadUrl { job_id: String, url: String },

    /// The finished PDF could not be downloaded.
    #[error("Failed to download '{url}' (status: {status})")]
    DownloadFailed { url: String, status: u16 },

    // ── Polling ───────────────────────────────────────────────────────────
    /// The job did not reach a terminal state before the polling deadline.
    /// `elapsed_ms` is in milliseconds; the message shows seconds.
    #[error(
        "PDF conversion timed out after {:.1} seconds waiting for job '{job_id}' to complete",
        seconds(.elapsed_ms)
    )]
    Timeout { job_id: String, elapsed_ms: u64 },

    // ── Webhook errors ────────────────────────────────────────────────────
    /// The webhook signature does not match the body.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// The webhook body (with a valid signature) is not valid JSON.
    #[error("Invalid JSON in webhook payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    // ── Transport / I/O ───────────────────────────────────────────────────
    /// Network-level failure: DNS, connect, TLS, malformed response body.
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading the upload or writing the downloaded PDF failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary HTML upload file could not be created or written.
    #[error("Failed to create temporary upload file: {0}")]
    TempFile(#[source] std::io::Error),

    /// The blocking wrapper could not start its tokio runtime.
    #[error("Failed to create tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

fn seconds(ms: &u64) -> f64 {
    *ms as f64 / 1000.0
}

/// Broad failure class of an [`Html2PdfError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidRequest,
    Conversion,
    Timeout,
    Signature,
    Payload,
    Transport,
    Io,
}

impl Html2PdfError {
    /// The failure class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey | Self::MissingWebhookSecret | Self::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            Self::NoSource | Self::FileNotFound { .. } => ErrorKind::InvalidRequest,
            Self::SubmissionFailed { .. }
            | Self::MissingJobId
            | Self::StatusCheckFailed { .. }
            | Self::JobFailed { .. }
            | Self::InvalidDownloadUrl { .. }
            | Self::DownloadFailed { .. } => ErrorKind::Conversion,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidSignature => ErrorKind::Signature,
            Self::InvalidPayload(_) => ErrorKind::Payload,
            Self::Http(_) => ErrorKind::Transport,
            Self::Io { .. } | Self::TempFile(_) | Self::Runtime(_) => ErrorKind::Io,
        }
    }

    /// HTTP status code returned by the service, when the error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SubmissionFailed { status, .. }
            | Self::StatusCheckFailed { status, .. }
            | Self::DownloadFailed { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_failed_display() {
        let e = Html2PdfError::SubmissionFailed {
            status: 422,
            message: "invalid options".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("422"), "got: {msg}");
        assert!(msg.contains("invalid options"), "got: {msg}");
        assert_eq!(e.status(), Some(422));
        assert_eq!(e.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn timeout_display() {
        let e = Html2PdfError::Timeout {
            job_id: "abc".into(),
            elapsed_ms: 1500,
        };
        assert!(e.to_string().contains("after 1.5 seconds"), "got: {e}");
        assert!(e.to_string().contains("abc"));
        assert_eq!(e.kind(), ErrorKind::Timeout);
        assert_eq!(e.status(), None);
    }

    #[test]
    fn job_failed_is_conversion_without_status() {
        let e = Html2PdfError::JobFailed {
            job_id: "j1".into(),
            message: "Unknown error".into(),
        };
        assert_eq!(e.kind(), ErrorKind::Conversion);
        assert_eq!(e.status(), None);
    }

    #[test]
    fn configuration_kinds() {
        assert_eq!(Html2PdfError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            Html2PdfError::MissingWebhookSecret.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(Html2PdfError::NoSource.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn invalid_payload_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let e = Html2PdfError::InvalidPayload(json_err);
        assert_eq!(e.kind(), ErrorKind::Payload);
        assert!(std::error::Error::source(&e).is_some());
    }
}
