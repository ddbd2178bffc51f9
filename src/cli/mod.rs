//! # CLI Module
//!
//! User-facing commands of the uploader. Each command loads the settings it
//! needs, builds the library components with the shared reporter and turns
//! failures into a non-zero exit.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the Mixcloud OAuth flow now and caches the token
//! - [`logout`] - Deletes the cached token
//! - [`upload`] - Resolves show metadata and uploads a recording
//! - [`shows`] - Lists the show catalog, optionally fuzzy-searched
//!
//! ## Usage
//!
//! ```bash
//! cloudcast auth
//! cloudcast upload latenight.mp3 --title "Late Night Session" --day 1 --month 2 --year 2024
//! cloudcast shows --search "late night"
//! ```

mod auth;
mod shows;
mod upload;

pub use auth::auth;
pub use auth::logout;
pub use shows::shows;
pub use upload::upload;

use std::sync::Arc;

use reqwest::Client;

use crate::{
    config::{OAuthSettings, UploadSettings},
    error,
    mixcloud::auth::OAuthFlow,
    reporter::Reporter,
};

fn upload_settings() -> UploadSettings {
    match UploadSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    }
}

fn oauth_flow(settings: &UploadSettings, reporter: &Arc<dyn Reporter>) -> OAuthFlow {
    let oauth = match OAuthSettings::from_env() {
        Ok(oauth) => oauth,
        Err(e) => error!("Invalid OAuth configuration: {}", e),
    };

    let client = match Client::builder().timeout(settings.http_timeout).build() {
        Ok(client) => client,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    OAuthFlow::new(oauth, client, Arc::clone(reporter))
}
