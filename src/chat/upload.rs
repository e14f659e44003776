//! Two-phase attachment sends, phase one: multipart HTTP upload.
//!
//! The chat frame referencing the uploaded file is only built once the
//! upload response carried a `file_url`.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::session::SessionSettings;

/// A file read into memory and queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadJob {
    pub data: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
    /// Optional text sent alongside the attachment.
    pub content: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("file is {size} bytes, over the {max} byte cap")]
    TooLarge { size: u64, max: u64 },
    #[error("upload request failed: {0}")]
    Request(String),
    #[error("upload rejected: {message}")]
    Rejected { message: String },
    #[error("upload response did not contain a file url")]
    MissingFileUrl,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file_url: Option<String>,
    message: Option<String>,
}

/// Client-side size gate; oversized files are never uploaded.
pub fn check_size(size: u64, max: u64) -> Result<(), UploadError> {
    if size > max {
        return Err(UploadError::TooLarge { size, max });
    }
    Ok(())
}

/// Uploads the attachment and returns the server-assigned file URL.
pub async fn upload_attachment(
    client: &reqwest::Client,
    settings: &SessionSettings,
    job: &UploadJob,
) -> Result<String, UploadError> {
    let part = reqwest::multipart::Part::bytes(job.data.clone())
        .file_name(job.file_name.clone())
        .mime_str(&job.mime_type)
        .map_err(|error| UploadError::Request(format!("invalid mime type: {error}")))?;

    let form = reqwest::multipart::Form::new()
        .part("file", part)
        .text("user_id", settings.customer_id.to_string())
        .text("csrf_token", settings.csrf_token.clone());

    let mut request = client
        .post(&settings.upload_url)
        .multipart(form)
        .header("X-CSRF-Token", format!("bearer {}", settings.csrf_token));

    if let Some(cookie) = &settings.session_cookie {
        request = request.header(reqwest::header::COOKIE, cookie.clone());
    }

    let response = request
        .send()
        .await
        .map_err(|error| UploadError::Request(error.to_string()))?;

    let ok = response.status().is_success();
    let body = response
        .text()
        .await
        .map_err(|error| UploadError::Request(error.to_string()))?;

    parse_upload_response(ok, &body)
}

fn parse_upload_response(ok: bool, body: &str) -> Result<String, UploadError> {
    let parsed: UploadResponse = serde_json::from_str(body)
        .map_err(|error| UploadError::Request(format!("malformed upload response: {error}")))?;

    if !ok {
        return Err(match parsed.message {
            Some(message) => UploadError::Rejected { message },
            None => UploadError::Request("upload endpoint returned an error status".to_owned()),
        });
    }

    match parsed.file_url {
        Some(url) => Ok(url),
        // A 200 body can still be {"status":"error","message":...}.
        None => Err(match parsed.message {
            Some(message) => UploadError::Rejected { message },
            None => UploadError::MissingFileUrl,
        }),
    }
}

/// Best-effort MIME type from the file extension; the server only uses it
/// to pick an attachment category.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
