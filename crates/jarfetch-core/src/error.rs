//! Errors shared by the jarfetch crates.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request to '{url}' returned status {status}")]
    Status { url: String, status: u16 },

    #[error("Cache root '{}' exists but is not a directory", path.display())]
    InvalidCacheRoot { path: PathBuf },

    #[error("Cannot load '{}': {reason}", path.display())]
    InvalidJar { path: PathBuf, reason: String },

    #[error("Classpath loader rejected '{}': {message}", path.display())]
    IncompatibleLoader { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
