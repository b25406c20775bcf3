//! # html2pdf-client
//!
//! Client for a remote HTML-to-PDF conversion service.
//!
//! Submit raw HTML, a public URL, or a local file; the service renders it to
//! PDF asynchronously. The client then either hands back the job id (when a
//! webhook will deliver the result) or polls the job until it finishes and
//! downloads the PDF to a file or into memory. Inbound webhook callbacks are
//! authenticated with HMAC-SHA256.
//!
//! ## Flow
//!
//! ```text
//! ConversionRequest
//!  │
//!  ├─ 1. Submit   html → temp .html upload, file → multipart, url → JSON
//!  ├─ 2. Webhook? → ConversionOutput::Submitted { job_id }
//!  ├─ 3. Poll     GET /jobs/{id} until completed / failed / timeout
//!  └─ 4. Fetch    → SavedFile { path } | Buffer { bytes }
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use html2pdf_client::{ClientConfig, ConversionClient, ConversionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads HTML2PDF_API_KEY (and optionally HTML2PDF_WEBHOOK_SECRET / HTML2PDF_BASE_URL)
//!     let client = ConversionClient::new(ClientConfig::from_env()?)?;
//!     let output = client
//!         .convert(&ConversionRequest::url("https://example.com"))
//!         .await?;
//!     let pdf = output.into_bytes().unwrap_or_default();
//!     eprintln!("received {} bytes", pdf.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Webhooks
//!
//! ```rust
//! use html2pdf_client::{sign_payload, ClientConfig, ConversionClient};
//!
//! let client = ConversionClient::new(
//!     ClientConfig::builder().api_key("key").webhook_secret("whsec").build().unwrap(),
//! )
//! .unwrap();
//! let body = br#"{"jobId":"abc","status":"completed"}"#;
//! let signature = sign_payload("whsec", body).unwrap();
//! let payload = client.verify_webhook(body, &signature).unwrap();
//! assert_eq!(payload["jobId"], "abc");
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod webhook;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{ConversionClient, API_KEY_HEADER};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ErrorKind, Html2PdfError, Result};
pub use job::{JobStatus, JobStatusSnapshot};
pub use output::ConversionOutput;
pub use request::{
    AwaitOptions, ConversionRequest, ConversionRequestBuilder, ConversionSource, RenderOptions,
};
pub use webhook::{sign_payload, verify_signature, WEBHOOK_SIGNATURE_HEADER};
