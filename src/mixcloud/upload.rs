use std::path::{Path, PathBuf};

use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use thiserror::Error;

use crate::{types::UploadRequest, utils::MAX_TAGS};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Status and body of the upload endpoint's reply.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Posts the cloudcast as a multipart form, passing the token as the
/// `access_token` query parameter.
///
/// Payloads are read fully before the request is sent, so no file handle is
/// left open whatever the outcome.
pub async fn submit(
    client: &Client,
    upload_url: &str,
    token: &str,
    request: &UploadRequest,
) -> Result<SubmitResponse, SubmitError> {
    let form = build_form(request).await?;

    let res = client
        .post(upload_url)
        .query(&[("access_token", token)])
        .multipart(form)
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    Ok(SubmitResponse { status, body })
}

async fn build_form(request: &UploadRequest) -> Result<Form, SubmitError> {
    let mut form = Form::new()
        .part("mp3", file_part(&request.audio_path).await?)
        .text("name", request.title.clone())
        .text("description", request.description.clone());

    if let Some(picture) = &request.cover_image {
        form = form.part("picture", file_part(picture).await?);
    }

    for (i, tag) in request.tags.iter().take(MAX_TAGS).enumerate() {
        form = form.text(format!("tags-{i}-tag"), tag.clone());
    }

    Ok(form)
}

async fn file_part(path: &Path) -> Result<Part, SubmitError> {
    let bytes = async_fs::read(path).await.map_err(|source| SubmitError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_type(path))
        .map_err(SubmitError::Http)
}

fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match ext.as_str() {
        "mp3" => "audio/mpeg",
        "m4a" | "mp4" | "aac" => "audio/mp4",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" => "audio/ogg",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
