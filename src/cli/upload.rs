use std::{path::PathBuf, sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Mutex;

use crate::{
    error, info,
    management::TokenStore,
    reporter::Reporter,
    success,
    types::{UploadOptions, UploadOutcome},
    uploader::Uploader,
};

pub async fn upload(
    file: PathBuf,
    options: UploadOptions,
    dry_run: bool,
    reporter: Arc<dyn Reporter>,
) {
    if !file.is_file() {
        error!("Audio file not found: {}", file.display());
    }

    let settings = super::upload_settings();
    let flow = super::oauth_flow(&settings, &reporter);
    let tokens = Arc::new(Mutex::new(TokenStore::new(&settings.token_file)));

    let uploader = match Uploader::new(&settings, tokens, flow, Arc::clone(&reporter)).await {
        Ok(uploader) => uploader,
        Err(e) => error!("Cannot set up uploader: {}", e),
    };

    if dry_run {
        let request = uploader.prepare(&file, &options).await;
        info!("Title: {}", request.title);
        info!("Host: {}", request.host);
        info!("Tags: {}", request.tags.join(", "));
        info!(
            "Picture: {}",
            request
                .cover_image
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        info!("Description:\n{}", request.description);
        return;
    }

    // Authorize up front so the browser flow does not run under the spinner.
    if let Err(e) = uploader.access_token().await {
        error!("Authorization failed: {}", e);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Uploading {}...", file.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = uploader.upload(&file, &options).await;
    pb.finish_and_clear();

    match result {
        Ok(UploadOutcome::Uploaded { .. }) => success!("Uploaded {}", file.display()),
        Ok(UploadOutcome::CredentialInvalid { status }) => error!(
            "Mixcloud rejected the access token ({}). Run the upload again to re-authorize.",
            status
        ),
        Ok(UploadOutcome::Rejected { status, .. }) => {
            error!("Mixcloud rejected the upload with status {}", status)
        }
        Err(e) => error!("Upload failed: {}", e),
    }
}
