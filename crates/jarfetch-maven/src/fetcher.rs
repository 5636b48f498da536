//! Jar fetch pipeline.
//!
//! Per root artifact: pick a repository, resolve its dependency set, add the
//! root itself, drop anything already in the local cache. All roots' work is
//! then flattened and downloaded with bounded parallelism. A failing download
//! is logged and counted; it never aborts its siblings. A failing root
//! resolution aborts the whole call.

use crate::config::FetcherConfig;
use crate::coordinate::Coordinate;
use crate::error::{MavenError, Result};
use crate::repository::RepositoryList;
use crate::resolver::DependencyResolver;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use jarfetch_core::{HttpClient, JarLoader, LocalCache, validate_jar};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of one [`MavenFetcher::fetch_jars`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Jars downloaded and written to the cache.
    pub fetched: usize,
    /// Work items found in the cache by the time their download started.
    pub already_cached: usize,
    /// Coordinates that could not be downloaded.
    pub failed: Vec<Coordinate>,
}

enum JarOutcome {
    Fetched(PathBuf),
    AlreadyCached,
}

/// One lock per cache file name, so a jar has at most one writer.
/// Lives for a single [`MavenFetcher::fetch_jars`] call.
type LockTable = DashMap<String, Arc<Mutex<()>>>;

pub struct MavenFetcher {
    config: FetcherConfig,
    client: HttpClient,
    repositories: RepositoryList,
    cache: LocalCache,
}

impl MavenFetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = HttpClient::with_connect_timeout(config.connect_timeout())?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: FetcherConfig, client: HttpClient) -> Self {
        Self {
            repositories: RepositoryList::new(config.repositories.iter().cloned()),
            cache: LocalCache::new(&config.cache_dir),
            client,
            config,
        }
    }

    /// Adds a repository ahead of all configured ones.
    pub fn add_repository(&mut self, url: impl Into<String>) {
        self.repositories.add(url);
    }

    pub fn repositories(&self) -> &RepositoryList {
        &self.repositories
    }

    /// Resolves every root and downloads the jars missing from the cache.
    ///
    /// # Errors
    ///
    /// Fails before any download if the cache root is invalid or any root
    /// cannot be parsed or resolved. Individual download failures are
    /// reported in [`FetchReport::failed`] instead.
    pub async fn fetch_jars<S: AsRef<str>>(&self, coordinates: &[S]) -> Result<FetchReport> {
        self.cache.ensure_root().await?;
        if self.repositories.is_empty() && !coordinates.is_empty() {
            tracing::warn!("no repositories configured, nothing can be resolved");
        }

        let mut work = Vec::new();
        for raw in coordinates {
            let root: Coordinate = raw.as_ref().parse()?;
            let pending = self.pending_for_root(&root).await?;
            tracing::debug!("{}: {} jar(s) to fetch", root, pending.len());
            work.extend(pending);
        }

        let concurrency = self.config.concurrency.max(1);
        let locks = LockTable::new();
        let outcomes: Vec<_> = stream::iter(work)
            .map(|coordinate| self.fetch_one(coordinate, &locks))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut report = FetchReport::default();
        for (coordinate, outcome) in outcomes {
            match outcome {
                Ok(JarOutcome::Fetched(path)) => {
                    tracing::info!("fetched {} -> {}", coordinate, path.display());
                    report.fetched += 1;
                }
                Ok(JarOutcome::AlreadyCached) => report.already_cached += 1,
                Err(e) => {
                    tracing::warn!("failed to fetch {}: {}", coordinate, e);
                    report.failed.push(coordinate);
                }
            }
        }

        tracing::info!("download {} of jars", report.fetched);
        Ok(report)
    }

    /// [`Self::fetch_jars`] followed by [`Self::load_jars`].
    pub async fn fetch_and_load_jars<S: AsRef<str>>(
        &self,
        coordinates: &[S],
        loader: &mut dyn JarLoader,
    ) -> Result<(FetchReport, Vec<PathBuf>)> {
        let report = self.fetch_jars(coordinates).await?;
        let loaded = self.load_jars(loader).await?;
        Ok((report, loaded))
    }

    /// Hands every jar in the cache to `loader`, in directory order.
    ///
    /// Performs no network access. Stops at the first jar the loader rejects.
    pub async fn load_jars(&self, loader: &mut dyn JarLoader) -> Result<Vec<PathBuf>> {
        let jars = self.cached_jars().await?;
        for jar in &jars {
            validate_jar(jar).map_err(MavenError::Load)?;
            loader.load(jar).map_err(MavenError::Load)?;
        }
        tracing::info!(
            "jars loaded {:?}",
            jars.iter()
                .filter_map(|j| j.file_name())
                .collect::<Vec<_>>()
        );
        Ok(jars)
    }

    pub async fn cached_jars(&self) -> Result<Vec<PathBuf>> {
        self.cache.ensure_root().await?;
        Ok(self.cache.jars().await?)
    }

    /// Resolved dependency set of `root`, plus `root`, minus cached jars.
    async fn pending_for_root(&self, root: &Coordinate) -> Result<Vec<Coordinate>> {
        let resolved = self
            .resolve_root(root)
            .await
            .map_err(|e| e.in_resolution_of(root.to_string()))?;
        Ok(self.uncached(resolved).await)
    }

    async fn resolve_root(&self, root: &Coordinate) -> Result<Vec<Coordinate>> {
        if root.is_dangling() {
            return Err(MavenError::DanglingCoordinate {
                coordinates: root.to_string(),
            });
        }
        let repo = self
            .repositories
            .select(&self.client, root)
            .await
            .ok_or_else(|| MavenError::RepositoryUnavailable {
                coordinates: root.to_string(),
            })?;

        let mut deps = DependencyResolver::new(&self.client)
            .with_max_parent_depth(self.config.max_parent_depth)
            .resolve_pom(&repo, root)
            .await?;
        deps.push(root.clone());
        Ok(deps)
    }

    async fn uncached(&self, resolved: Vec<Coordinate>) -> Vec<Coordinate> {
        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for coordinate in resolved {
            if !seen.insert(coordinate.clone()) {
                continue;
            }
            let cached = match coordinate.cache_file_name() {
                Ok(name) => self.cache.contains(&name).await,
                Err(_) => false,
            };
            if !cached {
                pending.push(coordinate);
            }
        }
        pending
    }

    async fn fetch_one(
        &self,
        coordinate: Coordinate,
        locks: &LockTable,
    ) -> (Coordinate, Result<JarOutcome>) {
        tracing::info!("try fetch {}", coordinate);
        let outcome = self.fetch_jar(&coordinate, locks).await;
        (coordinate, outcome)
    }

    async fn fetch_jar(&self, coordinate: &Coordinate, locks: &LockTable) -> Result<JarOutcome> {
        let file_name = coordinate.cache_file_name()?;

        let lock = locks.entry(file_name.clone()).or_default().clone();
        let _guard = lock.lock().await;

        if self.cache.contains(&file_name).await {
            return Ok(JarOutcome::AlreadyCached);
        }

        let repo = self
            .repositories
            .select(&self.client, coordinate)
            .await
            .ok_or_else(|| MavenError::RepositoryUnavailable {
                coordinates: coordinate.to_string(),
            })?;

        let url = coordinate.jar_url(&repo)?;
        tracing::debug!("fetching {} from {}", coordinate, repo);
        let bytes = self
            .client
            .get_bytes(&url)
            .await
            .map_err(|source| MavenError::Fetch { url, source })?;

        let path = self.cache.store(&file_name, &bytes).await?;
        Ok(JarOutcome::Fetched(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fetcher(cache: &TempDir, repos: Vec<String>) -> MavenFetcher {
        let config = FetcherConfig {
            cache_dir: cache.path().to_path_buf(),
            repositories: repos,
            ..FetcherConfig::default()
        };
        MavenFetcher::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_uncached_dedups_and_skips_cached() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("g-cached-1.jar"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("g-dir-1.jar")).unwrap();
        let fetcher = fetcher(&tmp, vec![]);

        let pending = fetcher
            .uncached(vec![
                Coordinate::new("g", "a", "1"),
                Coordinate::new("g", "cached", "1"),
                Coordinate::new("g", "a", "1"),
                Coordinate::dangling("g", "b"),
                Coordinate::new("g", "dir", "1"),
            ])
            .await;
        assert_eq!(
            pending,
            vec![
                Coordinate::new("g", "a", "1"),
                Coordinate::dangling("g", "b"),
                Coordinate::new("g", "dir", "1"),
            ]
        );
    }

    #[test]
    fn test_add_repository_takes_priority() {
        let tmp = TempDir::new().unwrap();
        let mut fetcher = fetcher(&tmp, vec!["https://central".into()]);
        fetcher.add_repository("https://mirror");
        assert_eq!(
            fetcher.repositories().urls(),
            &["https://mirror", "https://central"]
        );
    }

    #[tokio::test]
    async fn test_dangling_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(&tmp, vec![]);
        let err = fetcher.fetch_jars(&["com.example:lib:"]).await.unwrap_err();
        assert!(matches!(
            err.root_cause(),
            MavenError::DanglingCoordinate { .. }
        ));
    }

    #[tokio::test]
    async fn test_malformed_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(&tmp, vec![]);
        let err = fetcher.fetch_jars(&["nonsense"]).await.unwrap_err();
        assert!(matches!(err, MavenError::MalformedCoordinate { .. }));
    }

    #[tokio::test]
    async fn test_no_repository_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(&tmp, vec![]);
        let err = fetcher.fetch_jars(&["com.example:lib:1.0"]).await.unwrap_err();
        match err {
            MavenError::Resolution {
                coordinates,
                source,
            } => {
                assert_eq!(coordinates, "com.example:lib:1.0");
                assert!(matches!(*source, MavenError::RepositoryUnavailable { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_cache_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join(".mvn");
        std::fs::write(&file, b"file").unwrap();
        let config = FetcherConfig {
            cache_dir: file,
            ..FetcherConfig::default()
        };
        let fetcher = MavenFetcher::new(config).unwrap();
        let err = fetcher.fetch_jars::<&str>(&[]).await.unwrap_err();
        assert!(matches!(err, MavenError::InvalidCacheRoot { .. }));
    }

    #[tokio::test]
    async fn test_empty_request_creates_cache() {
        let tmp = TempDir::new().unwrap();
        let config = FetcherConfig {
            cache_dir: tmp.path().join(".mvn"),
            ..FetcherConfig::default()
        };
        let fetcher = MavenFetcher::new(config).unwrap();
        let report = fetcher.fetch_jars::<&str>(&[]).await.unwrap();
        assert_eq!(report, FetchReport::default());
        assert!(tmp.path().join(".mvn").is_dir());
    }

    #[tokio::test]
    async fn test_concurrent_writers_share_one_download() {
        let mut server = mockito::Server::new_async().await;
        let _head = server
            .mock("HEAD", "/g/a/1/a-1.pom")
            .with_status(200)
            .create_async()
            .await;
        let jar = server
            .mock("GET", "/g/a/1/a-1.jar")
            .with_status(200)
            .with_body("jar")
            .expect(1)
            .create_async()
            .await;

        let tmp = TempDir::new().unwrap();
        let fetcher = fetcher(&tmp, vec![server.url()]);
        let locks = LockTable::new();
        let coordinate = Coordinate::new("g", "a", "1");

        let (first, second) = tokio::join!(
            fetcher.fetch_jar(&coordinate, &locks),
            fetcher.fetch_jar(&coordinate, &locks)
        );
        let outcomes = [first.unwrap(), second.unwrap()];
        let fetched = outcomes
            .iter()
            .filter(|o| matches!(o, JarOutcome::Fetched(_)))
            .count();
        let cached = outcomes
            .iter()
            .filter(|o| matches!(o, JarOutcome::AlreadyCached))
            .count();
        assert_eq!((fetched, cached), (1, 1));
        jar.assert_async().await;
    }
}
