//! Core plumbing for jarfetch.
//!
//! This crate carries the ecosystem-agnostic pieces the Maven resolver is
//! built on: a small HTTP client for probes and downloads, the flat local jar
//! cache, and the classpath loader capability.

pub mod cache;
pub mod error;
pub mod http;
pub mod loader;

pub use cache::{DEFAULT_CACHE_DIR, LocalCache};
pub use error::{CoreError, Result};
pub use http::{DEFAULT_CONNECT_TIMEOUT, HttpClient};
pub use loader::{ClasspathCollector, JarLoader, validate_jar};
