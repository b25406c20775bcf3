//! Conversion requests and polling options.
//!
//! A [`ConversionRequest`] always carries exactly one [`ConversionSource`];
//! the builder refuses to produce a request without one, so "nothing to
//! convert" is caught before any network traffic happens.
//!
//! # Source precedence
//! When more than one source is given to the builder, the first present one in
//! this order wins: **html → file → url**. Raw HTML is uploaded as a
//! temporary `.html` file, so it shares the file upload path; a URL is only
//! used when neither html nor a file was supplied. Empty strings count as
//! absent.

use crate::error::{Html2PdfError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Default delay between two status polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
/// Default polling deadline for [`crate::ConversionClient::convert`].
pub const DEFAULT_CONVERT_TIMEOUT_MS: u64 = 300_000;
/// Default polling deadline for [`crate::ConversionClient::await_job`].
pub const DEFAULT_AWAIT_TIMEOUT_MS: u64 = 900_000;

/// Service-side render options (page size, margins, …), passed through as-is.
///
/// Kept untyped so new service options work without a crate release.
pub type RenderOptions = Map<String, Value>;

/// What to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionSource {
    /// Raw HTML markup, uploaded as a temporary `.html` file.
    Html(String),
    /// A public URL the service fetches itself.
    Url(String),
    /// A local file uploaded as multipart content.
    File(PathBuf),
}

impl ConversionSource {
    /// Reject sources that carry nothing to convert.
    pub(crate) fn validate(&self) -> Result<()> {
        let empty = match self {
            ConversionSource::Html(s) | ConversionSource::Url(s) => s.is_empty(),
            ConversionSource::File(p) => p.as_os_str().is_empty(),
        };
        if empty {
            return Err(Html2PdfError::NoSource);
        }
        Ok(())
    }
}

/// A single conversion job to submit.
///
/// # Example
/// ```rust
/// use html2pdf_client::ConversionRequest;
/// use serde_json::json;
///
/// let request = ConversionRequest::builder()
///     .html("<h1>Hello PDF</h1>")
///     .render_option("format", json!("A4"))
///     .save_to("out.pdf")
///     .timeout_ms(120_000)
///     .build()
///     .unwrap();
/// assert!(request.webhook_url.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: ConversionSource,
    /// Sent as the `options` field.
    pub render_options: RenderOptions,
    /// When set, `convert` returns right after submission and the service
    /// calls this URL once the job finishes.
    pub webhook_url: Option<String>,
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    /// Stream the PDF to this path instead of buffering it in memory.
    pub save_to: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn builder() -> ConversionRequestBuilder {
        ConversionRequestBuilder::default()
    }

    /// Convert raw HTML with default options.
    pub fn html(html: impl Into<String>) -> Self {
        Self::with_source(ConversionSource::Html(html.into()))
    }

    /// Convert a public web page with default options.
    pub fn url(url: impl Into<String>) -> Self {
        Self::with_source(ConversionSource::Url(url.into()))
    }

    /// Convert a local file with default options.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::with_source(ConversionSource::File(path.as_ref().to_path_buf()))
    }

    fn with_source(source: ConversionSource) -> Self {
        Self {
            source,
            render_options: RenderOptions::new(),
            webhook_url: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_CONVERT_TIMEOUT_MS,
            save_to: None,
        }
    }

    /// Polling options derived from this request.
    pub fn await_options(&self) -> AwaitOptions {
        AwaitOptions {
            poll_interval_ms: self.poll_interval_ms,
            timeout_ms: self.timeout_ms,
            save_to: self.save_to.clone(),
        }
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug, Default)]
pub struct ConversionRequestBuilder {
    html: Option<String>,
    url: Option<String>,
    file: Option<PathBuf>,
    render_options: RenderOptions,
    webhook_url: Option<String>,
    poll_interval_ms: Option<u64>,
    timeout_ms: Option<u64>,
    save_to: Option<PathBuf>,
}

impl ConversionRequestBuilder {
    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace all render options at once.
    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set a single render option, keeping the others.
    pub fn render_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.render_options.insert(key.into(), value.into());
        self
    }

    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    pub fn save_to(mut self, path: impl AsRef<Path>) -> Self {
        self.save_to = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the request. Fails with [`Html2PdfError::NoSource`] when no
    /// non-empty html, file or url was given.
    pub fn build(self) -> Result<ConversionRequest> {
        let html = self.html.filter(|s| !s.is_empty());
        let file = self.file.filter(|p| !p.as_os_str().is_empty());
        let url = self.url.filter(|s| !s.is_empty());

        let source = match (html, file, url) {
            (Some(html), _, _) => ConversionSource::Html(html),
            (None, Some(file), _) => ConversionSource::File(file),
            (None, None, Some(url)) => ConversionSource::Url(url),
            (None, None, None) => return Err(Html2PdfError::NoSource),
        };

        Ok(ConversionRequest {
            source,
            render_options: self.render_options,
            webhook_url: self.webhook_url.filter(|s| !s.is_empty()),
            poll_interval_ms: self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            timeout_ms: self.timeout_ms.unwrap_or(DEFAULT_CONVERT_TIMEOUT_MS),
            save_to: self.save_to,
        })
    }
}

/// Options for [`crate::ConversionClient::await_job`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitOptions {
    pub poll_interval_ms: u64,
    /// Measured from the start of each `await_job` call, not from submission.
    pub timeout_ms: u64,
    pub save_to: Option<PathBuf>,
}

impl Default for AwaitOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_AWAIT_TIMEOUT_MS,
            save_to: None,
        }
    }
}
