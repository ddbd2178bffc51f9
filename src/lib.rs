//! Mixcloud Show Uploader Library
//!
//! This library publishes show recordings to Mixcloud. It authenticates once
//! through an OAuth authorization-code flow, caches the resulting token,
//! enriches each upload from a CSV show catalog using fuzzy name matching and
//! submits the recording as a multipart request.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Token cache, show catalog and cover artwork lookup
//! - `mixcloud` - Mixcloud OAuth and upload client
//! - `reporter` - Injected diagnostics handle
//! - `server` - One-shot local HTTP server for the OAuth redirect
//! - `types` - Data structures and type definitions
//! - `uploader` - Upload orchestration
//! - `utils` - Fuzzy matching and field builders

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod mixcloud;
pub mod reporter;
pub mod server;
pub mod types;
pub mod uploader;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the OAuth callback...");
/// info!("Loaded {} shows", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary layer uses this. Library code reports through
/// [`reporter::Reporter`] and returns errors instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
