//! Submission building: turn a [`ConversionRequest`] into a `POST /convert`.
//!
//! ## Why a temp file for raw HTML?
//!
//! The service accepts markup only as an uploaded file, so raw HTML is first
//! written to `temp-<random>.html` in the system temp directory. The file is
//! owned by a [`NamedTempFile`] kept inside [`Submission`]; it is deleted when
//! the submission is dropped, whichever way the request ends (success, HTTP
//! error, transport error, or the future being cancelled).

use crate::error::{Html2PdfError, Result};
use crate::request::{ConversionRequest, ConversionSource, RenderOptions};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// A ready-to-send submission plus the temp file it may depend on.
///
/// Keep the whole struct alive until the response body has been read.
pub struct Submission {
    pub request: RequestBuilder,
    pub temp_file: Option<NamedTempFile>,
}

/// JSON body used when the service fetches a URL itself.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UrlSubmission<'a> {
    url: &'a str,
    options: &'a RenderOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook_url: Option<&'a str>,
}

/// Build the submission for `request` against `endpoint`.
pub async fn prepare(
    http: &Client,
    endpoint: Url,
    request: &ConversionRequest,
) -> Result<Submission> {
    request.source.validate()?;
    let webhook_url = request.webhook_url.as_deref();

    match &request.source {
        ConversionSource::Html(html) => {
            let temp_file = materialize_html(html)?;
            let form = multipart_form(temp_file.path(), &request.render_options, webhook_url).await?;
            Ok(Submission {
                request: http.post(endpoint).multipart(form),
                temp_file: Some(temp_file),
            })
        }
        ConversionSource::File(path) => {
            let form = multipart_form(path, &request.render_options, webhook_url).await?;
            Ok(Submission {
                request: http.post(endpoint).multipart(form),
                temp_file: None,
            })
        }
        ConversionSource::Url(url) => {
            debug!("Submitting URL for conversion: {}", url);
            let body = UrlSubmission {
                url,
                options: &request.render_options,
                webhook_url,
            };
            Ok(Submission {
                request: http.post(endpoint).json(&body),
                temp_file: None,
            })
        }
    }
}

/// Write `html` to a uniquely named `.html` file in the system temp dir.
pub fn materialize_html(html: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("temp-")
        .suffix(".html")
        .rand_bytes(32)
        .tempfile()
        .map_err(Html2PdfError::TempFile)?;
    file.write_all(html.as_bytes())
        .and_then(|_| file.flush())
        .map_err(Html2PdfError::TempFile)?;
    debug!("Materialised HTML to {}", file.path().display());
    Ok(file)
}

/// Multipart body: `file`, `options` (JSON string), optional `webhookUrl`.
async fn multipart_form(
    path: &Path,
    options: &RenderOptions,
    webhook_url: Option<&str>,
) -> Result<Form> {
    let file = match tokio::fs::File::open(path).await {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Html2PdfError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Html2PdfError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let length = file
        .metadata()
        .await
        .map_err(|source| Html2PdfError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    debug!("Uploading {} ({} bytes)", file_name, length);

    let part = Part::stream_with_length(reqwest::Body::from(file), length)
        .file_name(file_name)
        .mime_str(content_type_for(path))?;

    let options_json = serde_json::to_string(options).map_err(|e| {
        Html2PdfError::InvalidConfig(format!("render options are not serialisable: {e}"))
    })?;

    let mut form = Form::new().part("file", part).text("options", options_json);
    if let Some(url) = webhook_url {
        form = form.text("webhookUrl", url.to_string());
    }
    Ok(form)
}

/// Content type sent with the uploaded file part.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("xhtml") => "application/xhtml+xml",
        Some("md") | Some("markdown") => "text/markdown",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
