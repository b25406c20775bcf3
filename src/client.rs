//! The conversion client: submit, poll, download, verify.
//!
//! ## Flow
//!
//! ```text
//! convert(request)
//!  │
//!  ├─ 1. Submit   POST /convert (multipart upload or JSON url body)
//!  ├─ 2. Webhook? return Submitted { job_id } right away
//!  ├─ 3. Poll     GET /jobs/{id} every poll_interval_ms until terminal
//!  └─ 4. Fetch    GET downloadUrl → SavedFile { path } | Buffer { bytes }
//! ```
//!
//! The client holds nothing mutable: an `Arc` of the immutable config, the
//! parsed base URL and a pooled `reqwest::Client`. Cloning is cheap and
//! clones can be used from several tasks at once.

use crate::config::ClientConfig;
use crate::error::{Html2PdfError, Result};
use crate::job::{self, JobStatus, JobStatusSnapshot, SubmitResponse};
use crate::output::ConversionOutput;
use crate::pipeline::{download, upload};
use crate::request::{AwaitOptions, ConversionRequest};
use crate::webhook;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Client for the HTML-to-PDF conversion service.
///
/// # Example
/// ```rust,no_run
/// use html2pdf_client::{ClientConfig, ConversionClient, ConversionOutput, ConversionRequest};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ConversionClient::new(ClientConfig::from_env()?)?;
/// let request = ConversionRequest::builder()
///     .html("<html><body><h1>Hello PDF</h1></body></html>")
///     .save_to("out.pdf")
///     .timeout_ms(120_000)
///     .build()?;
///
/// if let ConversionOutput::SavedFile { path } = client.convert(&request).await? {
///     println!("Saved to: {}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConversionClient {
    config: Arc<ClientConfig>,
    base_url: Url,
    http: reqwest::Client,
}

impl fmt::Debug for ConversionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionClient")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ConversionClient {
    /// Build a client from `config`.
    ///
    /// The HTTP transport sends `x-api-key` on every request, has no
    /// request timeout (the polling deadline bounds the wait instead) and
    /// reports 4xx/5xx responses as data so the client can map them.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(config.base_url()).map_err(|e| {
            Html2PdfError::InvalidConfig(format!("base URL '{}': {e}", config.base_url()))
        })?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Html2PdfError::InvalidConfig(format!(
                "base URL '{}' must be an http(s) URL",
                config.base_url()
            )));
        }

        let mut api_key = HeaderValue::from_str(config.api_key()).map_err(|_| {
            Html2PdfError::InvalidConfig("apiKey contains characters not allowed in a header".into())
        })?;
        api_key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            config: Arc::new(config),
            base_url,
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit a conversion job and return the service-assigned job id.
    ///
    /// Raw HTML is uploaded through a temp file that is removed before this
    /// returns, on success and on every error path.
    pub async fn submit(&self, request: &ConversionRequest) -> Result<String> {
        let endpoint = self.endpoint(&["convert"])?;
        // The temp file must outlive the body read below.
        let upload::Submission {
            request: http_request,
            temp_file: _temp_file,
        } = upload::prepare(&self.http, endpoint, request).await?;

        let response = http_request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() >= 400 {
            return Err(Html2PdfError::SubmissionFailed {
                status: status.as_u16(),
                message: job::error_message(&body),
            });
        }

        let job_id = serde_json::from_str::<SubmitResponse>(&body)
            .ok()
            .and_then(|r| r.job_id)
            .filter(|id| !id.is_empty())
            .ok_or(Html2PdfError::MissingJobId)?;

        info!("Submitted conversion job {}", job_id);
        Ok(job_id)
    }

    /// Submit `request`, then either return the job id (webhook mode) or
    /// wait for the result.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutput> {
        let job_id = self.submit(request).await?;

        if request.webhook_url.is_some() {
            debug!("Webhook configured; not polling job {}", job_id);
            return Ok(ConversionOutput::Submitted { job_id });
        }

        self.await_job(&job_id, &request.await_options()).await
    }

    /// Synchronous wrapper around [`ConversionClient::convert`].
    ///
    /// Creates a temporary tokio runtime internally; must not be called from
    /// inside an async context.
    pub fn convert_blocking(&self, request: &ConversionRequest) -> Result<ConversionOutput> {
        let runtime = tokio::runtime::Runtime::new().map_err(Html2PdfError::Runtime)?;
        // Pooled connections are tied to the runtime that opened them.
        let client = Self::new(ClientConfig::clone(&self.config))?;
        runtime.block_on(client.convert(request))
    }

    /// Fetch the current status of `job_id` once.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusSnapshot> {
        let url = self.endpoint(&["jobs", job_id])?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.as_u16() >= 400 {
            return Err(Html2PdfError::StatusCheckFailed {
                job_id: job_id.to_string(),
                status: status.as_u16(),
                message: job::error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| Html2PdfError::StatusCheckFailed {
            job_id: job_id.to_string(),
            status: status.as_u16(),
            message: format!("unreadable status response: {e}"),
        })
    }

    /// Poll `job_id` until it completes, fails, or `options.timeout_ms`
    /// elapses, then download the PDF.
    ///
    /// The deadline starts when this call starts; calling it again for the
    /// same job gets a fresh deadline.
    pub async fn await_job(&self, job_id: &str, options: &AwaitOptions) -> Result<ConversionOutput> {
        let start = Instant::now();
        let timeout = Duration::from_millis(options.timeout_ms);
        let interval = Duration::from_millis(options.poll_interval_ms);
        let mut polls = 0u32;

        loop {
            let snapshot = self.job_status(job_id).await?;
            polls += 1;
            debug!(
                "Job {}: {:?} (poll {}, {}ms elapsed)",
                job_id,
                snapshot.status,
                polls,
                start.elapsed().as_millis()
            );

            match snapshot.status {
                JobStatus::Completed => {
                    if let Some(url) = snapshot.download_url.as_deref().filter(|u| !u.is_empty()) {
                        info!("Job {} completed after {} polls", job_id, polls);
                        return self
                            .download(job_id, url, options.save_to.as_deref())
                            .await;
                    }
                }
                JobStatus::Failed => {
                    return Err(Html2PdfError::JobFailed {
                        job_id: job_id.to_string(),
                        message: snapshot
                            .error_message
                            .unwrap_or_else(|| "Unknown error".to_string()),
                    });
                }
                JobStatus::Pending | JobStatus::Processing | JobStatus::Unknown => {}
            }

            let elapsed = start.elapsed();
            if elapsed > timeout {
                return Err(Html2PdfError::Timeout {
                    job_id: job_id.to_string(),
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }

            sleep(interval).await;
        }
    }

    /// Verify an inbound webhook and return its JSON payload.
    ///
    /// `signature` is the `sha256=<hex>` header value sent by the service.
    pub fn verify_webhook(
        &self,
        raw_body: impl AsRef<[u8]>,
        signature: &str,
    ) -> Result<serde_json::Value> {
        self.verify_webhook_as(raw_body, signature)
    }

    /// Like [`ConversionClient::verify_webhook`], deserializing into `T`.
    pub fn verify_webhook_as<T: DeserializeOwned>(
        &self,
        raw_body: impl AsRef<[u8]>,
        signature: &str,
    ) -> Result<T> {
        let secret = self
            .config
            .webhook_secret()
            .filter(|s| !s.is_empty())
            .ok_or(Html2PdfError::MissingWebhookSecret)?;
        webhook::verify_and_parse(secret, raw_body.as_ref(), signature)
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    /// `base_url` with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Html2PdfError::InvalidConfig(format!("base URL '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve `download_url` (absolute or relative to the base URL) and fetch it.
    async fn download(
        &self,
        job_id: &str,
        download_url: &str,
        save_to: Option<&Path>,
    ) -> Result<ConversionOutput> {
        let url = self
            .base_url
            .join(download_url)
            .map_err(|_| Html2PdfError::InvalidDownloadUrl {
                job_id: job_id.to_string(),
                url: download_url.to_string(),
            })?;
        download::fetch(&self.http, url, save_to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ConversionClient {
        ConversionClient::new(
            ClientConfig::builder()
                .api_key("test-key")
                .base_url(base)
                .build()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn can_instantiate_with_api_key() {
        let c = ConversionClient::new(ClientConfig::new("test-key").unwrap()).unwrap();
        assert_eq!(c.config().api_key(), "test-key");
        assert_eq!(c.base_url.as_str(), "https://api.html2pdfconverter.com/");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = ClientConfig::builder()
            .api_key("k")
            .base_url("mailto:someone@example.com")
            .build()
            .unwrap();
        let err = ConversionClient::new(config).unwrap_err();
        assert!(matches!(err, Html2PdfError::InvalidConfig(_)));

        let config = ClientConfig::builder()
            .api_key("k")
            .base_url("not a url")
            .build()
            .unwrap();
        assert!(ConversionClient::new(config).is_err());
    }

    #[test]
    fn rejects_api_key_with_newline() {
        let config = ClientConfig::new("bad\nkey").unwrap();
        let err = ConversionClient::new(config).unwrap_err();
        assert!(matches!(err, Html2PdfError::InvalidConfig(_)));
    }

    #[test]
    fn endpoint_escapes_job_id() {
        let c = client("http://localhost:8080");
        let url = c.endpoint(&["jobs", "a/b c?d"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/jobs/a%2Fb%20c%3Fd");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = client("http://localhost:8080/api/v1/");
        let url = c.endpoint(&["convert"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/convert");
    }

    #[test]
    fn debug_does_not_leak_api_key() {
        let c = client("http://localhost:8080");
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("test-key"), "got: {dbg}");
    }

    #[test]
    fn verify_webhook_requires_secret() {
        let c = client("http://localhost:8080");
        let err = c.verify_webhook(b"{}", "sha256=00").unwrap_err();
        assert!(matches!(err, Html2PdfError::MissingWebhookSecret));
    }
}
