//! Upload orchestration.
//!
//! [`Uploader`] ties the pieces together for one upload call:
//!
//! ```text
//! token (cache, else OAuth) → show lookup → field merge → description/title
//!     → cover image → multipart submit → outcome
//! ```
//!
//! A metadata miss never fails an upload. A 401/403 from Mixcloud clears the
//! cached token and reports [`UploadOutcome::CredentialInvalid`]. The same
//! upload is not retried, and the next call starts a fresh OAuth flow.

use std::{path::Path, sync::Arc};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    config::UploadSettings,
    management::{ArtworkDirectory, Catalog, TokenStore, TokenStoreError},
    mixcloud::{
        auth::{OAuthError, TokenSource},
        upload::{self, SubmitError},
    },
    reporter::Reporter,
    types::{UploadOptions, UploadOutcome, UploadRequest, UploadResponse},
    utils,
};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("authorization failed: {0}")]
    Auth(#[from] OAuthError),

    #[error(transparent)]
    Token(#[from] TokenStoreError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

pub struct Uploader<S> {
    tokens: Arc<Mutex<TokenStore>>,
    source: S,
    catalog: Catalog,
    artwork: ArtworkDirectory,
    client: Client,
    upload_url: String,
    tracklist_base_url: String,
    reporter: Arc<dyn Reporter>,
}

impl<S: TokenSource> Uploader<S> {
    /// Builds an uploader from settings, loading the show catalog once.
    pub async fn new(
        settings: &UploadSettings,
        tokens: Arc<Mutex<TokenStore>>,
        source: S,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(settings.http_timeout)
            .build()
            .map_err(UploadError::Client)?;
        let catalog = Catalog::load(&settings.metadata_file, reporter.as_ref()).await;

        Ok(Self {
            tokens,
            source,
            catalog,
            artwork: ArtworkDirectory::new(&settings.images_dir),
            client,
            upload_url: settings.upload_url.clone(),
            tracklist_base_url: settings.tracklist_base_url.clone(),
            reporter,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolves every outbound field without touching the network.
    pub async fn prepare(&self, audio_path: &Path, options: &UploadOptions) -> UploadRequest {
        let show_name = options
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| audio_stem(audio_path));

        let record = self.catalog.resolve(&show_name);
        if record.is_none() {
            self.reporter
                .info(&format!("No catalog entry matches '{}'", show_name));
        }

        let matched_name = record
            .map(|r| r.name.clone())
            .unwrap_or_else(|| show_name.clone());
        let bio = record.map(|r| r.bio.as_str()).unwrap_or_default();
        let catalog_host = record.map(|r| r.host.as_str()).unwrap_or_default();
        let catalog_tags = record.map(|r| r.tags.as_slice()).unwrap_or_default();

        let host = utils::merge_field(options.host.as_deref(), catalog_host);
        let tags = utils::merge_tags(options.tags.as_deref(), catalog_tags);
        let date = options.date.as_ref().and_then(utils::build_date_string);

        let description = utils::build_description(
            bio,
            &matched_name,
            date.as_deref(),
            &self.tracklist_base_url,
        );
        let title = utils::display_title(&matched_name, date.as_deref(), &host);

        let cover_image = match &options.picture {
            Some(picture) => Some(picture.clone()),
            None => self.artwork.find(&matched_name, self.reporter.as_ref()).await,
        };

        UploadRequest {
            audio_path: audio_path.to_path_buf(),
            show_name: matched_name,
            title,
            host,
            tags,
            description,
            cover_image,
        }
    }

    /// Uploads one recording and interprets Mixcloud's answer.
    ///
    /// `Err` covers failures before a response exists: authorization,
    /// unreadable payloads, transport errors. Every HTTP status is turned
    /// into an [`UploadOutcome`].
    pub async fn upload(
        &self,
        audio_path: &Path,
        options: &UploadOptions,
    ) -> Result<UploadOutcome, UploadError> {
        let token = self.access_token().await?;
        let request = self.prepare(audio_path, options).await;

        self.reporter.info(&format!(
            "Uploading '{}' with tags {:?} and host '{}'",
            request.title, request.tags, request.host
        ));

        let response = upload::submit(&self.client, &self.upload_url, &token, &request).await?;
        let outcome = interpret_response(response.status, &response.body);

        match &outcome {
            UploadOutcome::Uploaded { key } => match key {
                Some(key) => self.reporter.success(&format!("Upload successful: {}", key)),
                None => self.reporter.success("Upload successful"),
            },
            UploadOutcome::CredentialInvalid { status } => {
                self.reporter.warning(&format!(
                    "Access token rejected ({}), deleting cached token",
                    status
                ));
                self.invalidate(&token).await;
            }
            UploadOutcome::Rejected { status, body } => {
                self.reporter
                    .error(&format!("Upload failed: {} {}", status, body));
            }
        }

        Ok(outcome)
    }

    /// Returns the cached token or runs the token source and caches its result.
    ///
    /// The store stays locked throughout, so concurrent callers share one
    /// authorization flow.
    pub async fn access_token(&self) -> Result<String, UploadError> {
        let mut store = self.tokens.lock().await;
        if let Some(token) = store.get().await? {
            return Ok(token);
        }

        let token = self.source.acquire().await?;
        store.save(&token).await?;
        self.reporter.info(&format!(
            "Saved new token to {}",
            store.path().display()
        ));
        Ok(token)
    }

    /// Clears the cache if it still holds the rejected token.
    async fn invalidate(&self, rejected: &str) {
        let mut store = self.tokens.lock().await;
        match store.get().await {
            Ok(Some(current)) if current != rejected => return,
            _ => {}
        }

        if let Err(e) = store.clear().await {
            self.reporter
                .error(&format!("Failed to remove token file: {}", e));
        }
    }
}

/// Maps the upload endpoint's status to an outcome.
pub fn interpret_response(status: StatusCode, body: &str) -> UploadOutcome {
    match status {
        StatusCode::OK => UploadOutcome::Uploaded {
            key: serde_json::from_str::<UploadResponse>(body)
                .ok()
                .and_then(|res| res.result)
                .and_then(|result| result.key),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UploadOutcome::CredentialInvalid {
            status: status.as_u16(),
        },
        _ => UploadOutcome::Rejected {
            status: status.as_u16(),
            body: body.to_string(),
        },
    }
}

/// File name without its extension, used when no title is given.
pub fn audio_stem(audio_path: &Path) -> String {
    audio_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

