//! Download of the finished PDF.
//!
//! With a destination path the body is streamed chunk by chunk to disk, so
//! a large PDF never sits in memory; without one it is buffered and returned
//! as bytes. A file left half-written by a failed stream is removed.

use crate::error::{Html2PdfError, Result};
use crate::output::ConversionOutput;
use futures::StreamExt;
use reqwest::{Client, Response, Url};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// GET `url` and either save it to `save_to` or buffer it.
pub async fn fetch(http: &Client, url: Url, save_to: Option<&Path>) -> Result<ConversionOutput> {
    let location = redacted(&url);
    debug!("Downloading PDF from {}", location);
    let response = http.get(url).send().await?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(Html2PdfError::DownloadFailed {
            url: location,
            status: status.as_u16(),
        });
    }

    match save_to {
        Some(path) => {
            let written = save_stream(response, path).await?;
            info!("Saved PDF to {} ({} bytes)", path.display(), written);
            Ok(ConversionOutput::SavedFile {
                path: path.to_path_buf(),
            })
        }
        None => {
            let bytes = response.bytes().await?;
            info!("Downloaded PDF ({} bytes)", bytes.len());
            Ok(ConversionOutput::Buffer {
                bytes: bytes.to_vec(),
            })
        }
    }
}

/// `url` without query or fragment; presigned URLs carry credentials there.
fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.to_string()
}

/// Stream `response` into `path` (create/truncate). Returns bytes written.
async fn save_stream(response: Response, path: &Path) -> Result<u64> {
    let io_err = |source: std::io::Error| Html2PdfError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    let result = write_chunks(response, &mut file, path).await;
    drop(file);

    if result.is_err() {
        let _ = tokio::fs::remove_file(path).await;
    }
    result
}

async fn write_chunks(response: Response, file: &mut tokio::fs::File, path: &Path) -> Result<u64> {
    let io_err = |source: std::io::Error| Html2PdfError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacted_drops_query_and_credentials() {
        let url = Url::parse(
            "https://user:pw@cdn.example.com/jobs/a.pdf?X-Amz-Signature=secret&X-Amz-Credential=key#p1",
        )
        .unwrap();
        assert_eq!(redacted(&url), "https://cdn.example.com/jobs/a.pdf");
    }
}
