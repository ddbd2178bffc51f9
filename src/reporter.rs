//! Diagnostics handle shared by the library components.
//!
//! The binary creates one [`ConsoleReporter`] at startup and hands an
//! `Arc<dyn Reporter>` to every component that needs to log. Nothing in the
//! library touches global logging state.

use std::{
    fmt,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

use chrono::Local;

use crate::{info, success, warning};

/// Severity of a diagnostic. `Success` is written to the log file as `INFO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Info => "INFO",
            Level::Success => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Sink for user-facing diagnostics.
///
/// Implementors only provide [`Reporter::report`]. Messages must never
/// contain the access token itself.
pub trait Reporter: Send + Sync {
    /// Records one message at `level`.
    fn report(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn success(&self, message: &str) {
        self.report(Level::Success, message);
    }

    fn warning(&self, message: &str) {
        self.report(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Prints colored status lines and optionally mirrors them to a log file.
///
/// File lines use the `"{timestamp} [LEVEL] message"` layout. A write
/// failure on the log file is ignored so diagnostics never abort an upload.
pub struct ConsoleReporter {
    log_file: Option<Mutex<File>>,
}

impl ConsoleReporter {
    /// Console output only.
    pub fn new() -> Self {
        Self { log_file: None }
    }

    /// Console output plus a log file opened for appending. Missing parent
    /// directories are created.
    pub fn with_log_file(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            log_file: Some(Mutex::new(file)),
        })
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Info => info!("{}", message),
            Level::Success => success!("{}", message),
            Level::Warning => warning!("{}", message),
            Level::Error => {
                use colored::Colorize;
                eprintln!("[{}] {}", "x".red().bold(), message);
            }
        }

        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(
                    file,
                    "{} [{}] {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    level,
                    message
                );
            }
        }
    }
}
