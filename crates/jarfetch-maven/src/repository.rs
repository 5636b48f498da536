//! Repository list and availability probing.

use crate::coordinate::Coordinate;
use jarfetch_core::HttpClient;

/// Repository base URLs in priority order, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryList {
    urls: Vec<String>,
}

impl RepositoryList {
    pub fn new(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Prepends `url`, giving it priority over every existing entry.
    pub fn add(&mut self, url: impl Into<String>) {
        let url = url.into();
        let url = url.trim_end_matches('/').to_string();
        self.urls.retain(|existing| existing.trim_end_matches('/') != url);
        self.urls.insert(0, url);
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns the first repository whose HEAD probe for the coordinate's POM
    /// answers 2xx, or `None` if no repository serves it.
    ///
    /// Probing stops at the first hit. Transport failures count as misses.
    pub async fn select(&self, client: &HttpClient, coordinate: &Coordinate) -> Option<String> {
        for repo in &self.urls {
            let Ok(url) = coordinate.pom_url(repo) else {
                return None;
            };
            match client.exists(&url).await {
                Ok(true) => {
                    tracing::debug!("{} served by {}", coordinate, repo);
                    return Some(repo.clone());
                }
                Ok(false) => {}
                Err(e) => tracing::debug!("probe of {} failed: {}", url, e),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM_PATH: &str = "/com/example/lib/1.0.0/lib-1.0.0.pom";

    fn coordinate() -> Coordinate {
        Coordinate::new("com.example", "lib", "1.0.0")
    }

    #[test]
    fn test_add_prepends() {
        let mut repos = RepositoryList::new(["https://central"]);
        repos.add("https://first");
        repos.add("https://second/");
        assert_eq!(
            repos.urls(),
            &["https://second", "https://first", "https://central"]
        );
    }

    #[test]
    fn test_add_existing_moves_to_front() {
        let mut repos = RepositoryList::new(["https://a", "https://b"]);
        repos.add("https://b");
        assert_eq!(repos.urls(), &["https://b", "https://a"]);
    }

    #[tokio::test]
    async fn test_select_first_hit_and_short_circuit() {
        let mut miss = mockito::Server::new_async().await;
        let mut hit = mockito::Server::new_async().await;
        let mut never = mockito::Server::new_async().await;

        let miss_mock = miss
            .mock("HEAD", POM_PATH)
            .with_status(404)
            .expect(1)
            .create_async()
            .await;
        let hit_mock = hit
            .mock("HEAD", POM_PATH)
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let never_mock = never
            .mock("HEAD", POM_PATH)
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let repos = RepositoryList::new([miss.url(), hit.url(), never.url()]);
        let client = HttpClient::new().unwrap();
        let selected = repos.select(&client, &coordinate()).await;

        assert_eq!(selected, Some(hit.url()));
        miss_mock.assert_async().await;
        hit_mock.assert_async().await;
        never_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_select_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("HEAD", POM_PATH)
            .with_status(404)
            .create_async()
            .await;

        let repos = RepositoryList::new([server.url()]);
        let client = HttpClient::new().unwrap();
        assert_eq!(repos.select(&client, &coordinate()).await, None);
    }

    #[tokio::test]
    async fn test_prepending_changes_outcome() {
        let mut empty = mockito::Server::new_async().await;
        let mut extra = mockito::Server::new_async().await;
        let _miss = empty
            .mock("HEAD", POM_PATH)
            .with_status(404)
            .create_async()
            .await;
        let _hit = extra
            .mock("HEAD", POM_PATH)
            .with_status(200)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let mut repos = RepositoryList::new([empty.url()]);
        assert_eq!(repos.select(&client, &coordinate()).await, None);

        repos.add(extra.url());
        assert_eq!(repos.select(&client, &coordinate()).await, Some(extra.url()));
    }

    #[tokio::test]
    async fn test_select_dangling_is_none() {
        let repos = RepositoryList::new(["http://127.0.0.1:9"]);
        let client = HttpClient::new().unwrap();
        let dangling = Coordinate::dangling("com.example", "lib");
        assert_eq!(repos.select(&client, &dangling).await, None);
    }

    #[tokio::test]
    async fn test_unreachable_repository_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let _hit = server
            .mock("HEAD", POM_PATH)
            .with_status(200)
            .create_async()
            .await;

        // port 9 (discard) is closed on test hosts; the probe errors out
        let repos = RepositoryList::new(["http://127.0.0.1:9".to_string(), server.url()]);
        let client = HttpClient::new().unwrap();
        assert_eq!(repos.select(&client, &coordinate()).await, Some(server.url()));
    }
}
