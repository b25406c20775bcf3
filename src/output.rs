//! Result of a conversion call.

use std::path::{Path, PathBuf};

/// What [`crate::ConversionClient::convert`] and
/// [`crate::ConversionClient::await_job`] hand back.
///
/// `await_job` only ever returns `SavedFile` or `Buffer`; `Submitted` is
/// returned by `convert` when the request set a webhook URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutput {
    /// Job accepted; the result will be delivered to the webhook.
    Submitted { job_id: String },
    /// PDF streamed to the requested `save_to` path.
    SavedFile { path: PathBuf },
    /// PDF held in memory.
    Buffer { bytes: Vec<u8> },
}

impl ConversionOutput {
    /// Job id, for `Submitted`.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            ConversionOutput::Submitted { job_id } => Some(job_id),
            _ => None,
        }
    }

    /// Saved path, for `SavedFile`.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConversionOutput::SavedFile { path } => Some(path),
            _ => None,
        }
    }

    /// In-memory PDF bytes, for `Buffer`.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            ConversionOutput::Buffer { bytes } => Some(bytes),
            _ => None,
        }
    }

    /// Consume the output and keep only the buffered bytes.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            ConversionOutput::Buffer { bytes } => Some(bytes),
            _ => None,
        }
    }
}
