//! Flat on-disk jar cache.
//!
//! One directory, one file per artifact. Presence of a file is the only
//! cache-hit signal; no checksums or freshness checks are performed.
//! The directory is created lazily on first use.

use crate::error::{CoreError, Result};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Cache directory used when none is configured, relative to the working directory.
pub const DEFAULT_CACHE_DIR: &str = ".mvn";

const PARTIAL_SUFFIX: &str = ".part";

#[derive(Clone, Debug)]
pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the cache directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCacheRoot`] when the root path exists but
    /// is not a directory.
    pub async fn ensure_root(&self) -> Result<()> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(CoreError::InvalidCacheRoot {
                path: self.root.clone(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("creating cache directory {}", self.root.display());
                tokio::fs::create_dir_all(&self.root).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Returns true if `file_name` is present as a regular file.
    pub async fn contains(&self, file_name: &str) -> bool {
        tokio::fs::metadata(self.path_for(file_name))
            .await
            .is_ok_and(|meta| meta.is_file())
    }

    /// Writes `data` under `file_name`, replacing any existing file.
    ///
    /// The bytes land in a `.part` sibling first and are renamed into place,
    /// so a reader never observes a truncated jar.
    pub async fn store(&self, file_name: &str, data: &[u8]) -> Result<PathBuf> {
        let target = self.path_for(file_name);
        let partial = self.path_for(&format!("{file_name}{PARTIAL_SUFFIX}"));

        let mut file = tokio::fs::File::create(&partial).await?;
        file.write_all(data).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }
        Ok(target)
    }

    /// Lists every `.jar` file directly under the cache root.
    ///
    /// Order follows the directory listing. Subdirectories are not descended.
    pub async fn jars(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut jars = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "jar") && entry.file_type().await?.is_file()
            {
                jars.push(path);
            }
        }
        Ok(jars)
    }
}

impl Default for LocalCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_root_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("nested").join(".mvn"));
        cache.ensure_root().await.unwrap();
        assert!(cache.root().is_dir());
        // second call is a no-op
        cache.ensure_root().await.unwrap();
    }

    #[tokio::test]
    async fn test_ensure_root_rejects_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".mvn");
        std::fs::write(&path, b"not a directory").unwrap();

        let cache = LocalCache::new(&path);
        let err = cache.ensure_root().await.unwrap_err();
        assert!(matches!(err, CoreError::InvalidCacheRoot { .. }));
    }

    #[tokio::test]
    async fn test_store_and_contains() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());
        assert!(!cache.contains("a-b-1.0.jar").await);

        let path = cache.store("a-b-1.0.jar", b"PK\x03\x04").await.unwrap();
        assert_eq!(path, tmp.path().join("a-b-1.0.jar"));
        assert!(cache.contains("a-b-1.0.jar").await);
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04");
        assert!(!tmp.path().join("a-b-1.0.jar.part").exists());
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path());
        cache.store("x.jar", b"old").await.unwrap();
        let path = cache.store("x.jar", b"new").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_contains_ignores_directories() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("dir.jar")).unwrap();
        let cache = LocalCache::new(tmp.path());
        assert!(!cache.contains("dir.jar").await);
    }

    #[tokio::test]
    async fn test_jars_lists_only_top_level_jars() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.jar"), b"a").unwrap();
        std::fs::write(tmp.path().join("b.jar"), b"b").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(tmp.path().join("c.jar.part"), b"c").unwrap();
        std::fs::create_dir(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("sub").join("d.jar"), b"d").unwrap();

        let cache = LocalCache::new(tmp.path());
        let mut names: Vec<_> = cache
            .jars()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.jar", "b.jar"]);
    }

    #[test]
    fn test_default_root() {
        assert_eq!(LocalCache::default().root(), Path::new(".mvn"));
    }
}
