use std::{future::Future, sync::Arc};

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::{
    config::OAuthSettings,
    reporter::Reporter,
    server::{CallbackError, CallbackServer},
    types::AccessTokenResponse,
};

/// Failures of the authorization-code flow. All of them are fatal for the
/// upload that needed the token.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("invalid redirect URI {uri}: {reason}")]
    InvalidRedirectUri { uri: String, reason: String },

    #[error("invalid authorization URL {url}: {reason}")]
    InvalidAuthUrl { url: String, reason: String },

    #[error(transparent)]
    Callback(#[from] CallbackError),

    #[error("OAuth token request failed with status {status}: {body}")]
    Exchange { status: u16, body: String },

    #[error("no access_token returned by Mixcloud")]
    MissingAccessToken,

    #[error("OAuth request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Something that can produce a fresh access token when none is cached.
///
/// [`OAuthFlow`] is the real implementation. The uploader only depends on
/// this trait, so a fixed token can stand in for the browser.
pub trait TokenSource {
    /// Obtains a new token. Called with the token store locked.
    fn acquire(&self) -> impl Future<Output = Result<String, OAuthError>> + Send;
}

/// Where the local listener must bind to receive the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackTarget {
    /// Host of the redirect URI, without IPv6 brackets.
    pub host: String,
    /// Explicit port, or the scheme default.
    pub port: u16,
    /// Path the callback route is served on.
    pub path: String,
}

impl CallbackTarget {
    /// Host the listener binds to.
    ///
    /// `localhost` is bound as `127.0.0.1`. Resolving the name may yield only
    /// `::1`, while browsers fall back to IPv4 for `localhost` anyway.
    pub fn bind_host(&self) -> &str {
        if self.host.eq_ignore_ascii_case("localhost") {
            "127.0.0.1"
        } else {
            &self.host
        }
    }
}

/// Splits the redirect URI into the host, port and path the callback
/// listener serves.
pub fn callback_target(redirect_uri: &str) -> Result<CallbackTarget, OAuthError> {
    let invalid = |reason: &str| OAuthError::InvalidRedirectUri {
        uri: redirect_uri.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(redirect_uri).map_err(|e| invalid(&e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host"))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("missing port"))?;

    Ok(CallbackTarget {
        host,
        port,
        path: url.path().to_string(),
    })
}

/// Browser-based authorization-code flow against Mixcloud.
///
/// # Example
///
/// ```
/// let flow = OAuthFlow::new(OAuthSettings::from_env()?, Client::new(), reporter);
/// let token = flow.run().await?;
/// ```
pub struct OAuthFlow {
    settings: OAuthSettings,
    client: Client,
    reporter: Arc<dyn Reporter>,
}

impl OAuthFlow {
    /// Creates a flow. Nothing is bound or opened until [`OAuthFlow::run`].
    pub fn new(settings: OAuthSettings, client: Client, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            settings,
            client,
            reporter,
        }
    }

    /// Builds the authorize page URL the user has to visit.
    pub fn authorize_url(&self) -> Result<Url, OAuthError> {
        Url::parse_with_params(
            &self.settings.auth_url,
            &[
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("response_type", "code"),
            ],
        )
        .map_err(|e| OAuthError::InvalidAuthUrl {
            url: self.settings.auth_url.clone(),
            reason: e.to_string(),
        })
    }

    /// Runs the whole flow: bind the listener, open the browser, wait for
    /// the redirect and exchange the code.
    ///
    /// Any failure is fatal. Nothing is retried.
    pub async fn run(&self) -> Result<String, OAuthError> {
        let target = callback_target(&self.settings.redirect_uri)?;
        let server = match &self.settings.callback_address {
            Some(address) => CallbackServer::bind(address.as_str(), &target.path).await?,
            None => {
                CallbackServer::bind((target.bind_host(), target.port), &target.path).await?
            }
        };

        let auth_url = self.authorize_url()?;
        self.reporter.info("Opening browser for Mixcloud authorization...");
        if webbrowser::open(auth_url.as_str()).is_err() {
            self.reporter.warning(&format!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            ));
        }

        self.reporter.info(&format!(
            "Waiting for OAuth callback on {} ...",
            self.settings.redirect_uri
        ));
        let code = server.wait_for_code(self.settings.callback_timeout).await?;

        self.reporter.info("Got authorization code, exchanging for access token...");
        let token = self.exchange_code(&code).await?;
        self.reporter.success("OAuth flow completed successfully!");
        Ok(token)
    }

    /// Trades an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let res = self
            .client
            .post(&self.settings.token_url)
            .form(&[
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            self.reporter.error(&format!(
                "Failed to get access_token: {} {}",
                status.as_u16(),
                body
            ));
            return Err(OAuthError::Exchange {
                status: status.as_u16(),
                body,
            });
        }

        let json: AccessTokenResponse = res.json().await?;
        json.access_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(OAuthError::MissingAccessToken)
    }
}

/// Every acquisition runs the full browser flow.
impl TokenSource for OAuthFlow {
    async fn acquire(&self) -> Result<String, OAuthError> {
        self.run().await
    }
}
