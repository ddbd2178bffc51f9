//! # Mixcloud Integration Module
//!
//! Talks to Mixcloud's OAuth and upload endpoints.
//!
//! ```text
//! Uploader (orchestration)
//!          ↓
//! Mixcloud Integration Layer
//!     ├── auth   (authorization-code flow, token exchange)
//!     └── upload (multipart cloudcast submission)
//!          ↓
//! HTTP Layer (reqwest)
//! ```
//!
//! ## Authentication
//!
//! [`auth`] drives the browser-based authorization-code flow. It opens the
//! authorize page, waits for the redirect on a local
//! [`crate::server::CallbackServer`] and exchanges the code for an access
//! token using the client secret. Mixcloud tokens do not expire on a
//! schedule, so there is no refresh step. A token rejected by the API is
//! dropped and the flow runs again on the next upload.
//!
//! ## Upload
//!
//! [`upload`] assembles the multipart form (`mp3`, optional `picture`,
//! `name`, `description`, `tags-N-tag`) and posts it with the token as the
//! `access_token` query parameter. It returns the raw status and body.
//! Interpreting them is left to [`crate::uploader`].

pub mod auth;
pub mod upload;
