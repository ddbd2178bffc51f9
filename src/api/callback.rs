use std::collections::HashMap;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::mpsc;

/// Handles the OAuth redirect.
///
/// A request carrying `code` is answered with 200 and the code is sent to the
/// waiting flow. Anything else gets 400 and the flow keeps waiting.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(sender): Extension<mpsc::Sender<String>>,
) -> (StatusCode, Html<&'static str>) {
    match params.get("code").filter(|code| !code.is_empty()) {
        Some(code) => {
            // Only the first code matters, later ones find the channel full.
            let _ = sender.try_send(code.clone());
            (
                StatusCode::OK,
                Html("<h2>Authorization complete!</h2><p>You can close this window.</p>"),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing code parameter.</h4>"),
        ),
    }
}
