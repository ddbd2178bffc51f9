use std::sync::Arc;

use crate::{error, management::TokenStore, reporter::Reporter, success, warning};

pub async fn auth(reporter: Arc<dyn Reporter>) {
    let settings = super::upload_settings();
    let flow = super::oauth_flow(&settings, &reporter);

    let token = match flow.run().await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed: {}", e),
    };

    let mut store = TokenStore::new(&settings.token_file);
    if let Err(e) = store.save(&token).await {
        error!("Failed to save token to cache: {}", e);
    }

    success!(
        "Authentication successful! Token saved to {}",
        settings.token_file.display()
    );
}

pub async fn logout() {
    let settings = super::upload_settings();
    let mut store = TokenStore::new(&settings.token_file);

    if let Ok(None) = store.get().await {
        warning!("No cached token found.");
    }

    if let Err(e) = store.clear().await {
        error!("Failed to remove cached token: {}", e);
    }

    success!("Cached token cleared.");
}
