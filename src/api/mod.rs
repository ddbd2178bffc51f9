//! # API Module
//!
//! HTTP handlers served by the local callback server during the OAuth
//! authorization-code flow.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives Mixcloud's redirect after the user grants access
//!   and hands the authorization code to the waiting flow.
//!
//! The handlers are plain axum functions. [`crate::server::CallbackServer`]
//! mounts them on the redirect URI's path.

mod callback;

pub use callback::callback;
