use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One catalog entry, keyed by show name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    pub name: String,
    pub bio: String,
    pub host: String,
    pub tags: Vec<String>,
}

/// Raw catalog row as it appears in the CSV source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogRow {
    pub show: String,
    pub bio: String,
    pub host: String,
    pub tags: String,
}

/// JSON view of a show for `cloudcast shows --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ShowSummary {
    pub host: String,
    pub tags: Vec<String>,
}

#[derive(Tabled)]
pub struct ShowTableRow {
    pub name: String,
    pub host: String,
    pub tags: String,
}

/// Day, month and year exactly as the caller typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateParts {
    pub day: String,
    pub month: String,
    pub year: String,
}

/// Per-call inputs to an upload. Every field is optional and the catalog
/// fills in whatever is missing.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub title: Option<String>,
    pub host: Option<String>,
    pub tags: Option<Vec<String>>,
    pub date: Option<DateParts>,
    /// Takes precedence over the image directory lookup.
    pub picture: Option<PathBuf>,
}

/// Fully resolved upload, built fresh for every call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub audio_path: PathBuf,
    pub show_name: String,
    pub title: String,
    pub host: String,
    pub tags: Vec<String>,
    pub description: String,
    pub cover_image: Option<PathBuf>,
}

/// Terminal result of a submitted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// HTTP 200. `key` is the cloudcast key when the response carried one.
    Uploaded { key: Option<String> },
    /// HTTP 401 or 403. The cached token has been cleared.
    CredentialInvalid { status: u16 },
    /// Any other status.
    Rejected { status: u16, body: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub result: Option<UploadResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResult {
    pub success: Option<bool>,
    pub key: Option<String>,
}
