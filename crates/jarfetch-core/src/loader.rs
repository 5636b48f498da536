//! Classpath loading capability.
//!
//! The fetcher does not know how a jar becomes usable by the host process; it
//! hands each cached jar to a [`JarLoader`]. [`ClasspathCollector`] is the
//! stock implementation and builds a `java -cp` style classpath string.

use crate::error::{CoreError, Result};
use std::path::{Path, PathBuf};

/// Makes a jar available to the running process.
///
/// Implementors may assume `path` has been checked by [`validate_jar`].
/// Failures are never retried by callers.
pub trait JarLoader: Send {
    fn load(&mut self, path: &Path) -> Result<()>;
}

/// Checks that `path` exists, is a regular file and is readable.
pub fn validate_jar(path: &Path) -> Result<()> {
    let invalid = |reason: &str| CoreError::InvalidJar {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(invalid("does not exist")),
        Err(e) => return Err(e.into()),
    };
    if !meta.is_file() {
        return Err(invalid("not a regular file"));
    }
    std::fs::File::open(path).map_err(|e| invalid(&format!("not readable: {e}")))?;
    Ok(())
}

/// Collects loaded jars into an ordered classpath.
#[derive(Debug, Default, Clone)]
pub struct ClasspathCollector {
    entries: Vec<PathBuf>,
}

impl ClasspathCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Joins the collected entries with the platform path separator.
    pub fn classpath(&self) -> Result<String> {
        let joined =
            std::env::join_paths(&self.entries).map_err(|e| CoreError::IncompatibleLoader {
                path: PathBuf::new(),
                message: e.to_string(),
            })?;
        Ok(joined.to_string_lossy().into_owned())
    }
}

impl JarLoader for ClasspathCollector {
    fn load(&mut self, path: &Path) -> Result<()> {
        let absolute = std::path::absolute(path)?;
        if self.entries.contains(&absolute) {
            return Ok(());
        }
        tracing::debug!("classpath += {}", absolute.display());
        self.entries.push(absolute);
        Ok(())
    }
}
