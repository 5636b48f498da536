//! Dependency resolution through parent POM chains.
//!
//! A POM may declare dependencies without a version and rely on an ancestor's
//! `dependencyManagement` to supply it. The resolver walks the parent chain
//! strictly upward, one POM per step, and stops as soon as no dangling entry
//! remains or the chain ends. Each dangling entry takes the version from the
//! first ancestor that manages it.
//!
//! All POMs of one chain are fetched from the repository that served the
//! root artifact.

use crate::coordinate::{Coordinate, has_dangling};
use crate::error::{MavenError, Result};
use crate::pom::{parse_dependencies, parse_managed_dependencies};
use crate::types::ManagedPom;
use jarfetch_core::HttpClient;

/// Maximum parent POMs walked when no limit is configured.
pub const DEFAULT_MAX_PARENT_DEPTH: usize = 16;

pub struct DependencyResolver<'a> {
    client: &'a HttpClient,
    max_parent_depth: usize,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self {
            client,
            max_parent_depth: DEFAULT_MAX_PARENT_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_parent_depth(mut self, depth: usize) -> Self {
        self.max_parent_depth = depth;
        self
    }

    async fn fetch_pom(&self, repo: &str, coordinate: &Coordinate) -> Result<String> {
        let url = coordinate.pom_url(repo)?;
        self.client
            .get_text(&url)
            .await
            .map_err(|source| MavenError::Fetch { url, source })
    }

    /// Resolves the direct dependencies of `coordinate`, filling dangling
    /// versions from its parent chain.
    ///
    /// An already fully-versioned dependency set is returned without touching
    /// the parent. Entries that stay dangling because the chain has no parent
    /// left are returned as-is.
    ///
    /// # Errors
    ///
    /// Any fetch or parse failure along the chain aborts resolution.
    pub async fn resolve_pom(&self, repo: &str, coordinate: &Coordinate) -> Result<Vec<Coordinate>> {
        let content = self.fetch_pom(repo, coordinate).await?;
        let pom = parse_dependencies(&content)?;

        let deps = match pom.parent {
            Some(parent) if has_dangling(&pom.dependencies) => {
                let (deps, resolved_against) = self
                    .resolve_parent_chain(repo, pom.dependencies, parent)
                    .await?;
                tracing::debug!("{} resolved against parent {}", coordinate, resolved_against);
                deps
            }
            _ => pom.dependencies,
        };

        for dep in deps.iter().filter(|d| d.is_dangling()) {
            tracing::warn!("{}: no managed version found for {}", coordinate, dep);
        }
        Ok(deps)
    }

    /// Walks upward from `parent`, substituting managed versions into the
    /// dangling entries of `deps`.
    ///
    /// Returns the updated set and the last ancestor consulted.
    ///
    /// # Errors
    ///
    /// Returns [`MavenError::ParentChainTooDeep`] if dangling entries remain
    /// after `max_parent_depth` ancestors, or the first fetch/parse error.
    pub async fn resolve_parent_chain(
        &self,
        repo: &str,
        mut deps: Vec<Coordinate>,
        mut parent: Coordinate,
    ) -> Result<(Vec<Coordinate>, Coordinate)> {
        for _ in 0..self.max_parent_depth {
            let content = self.fetch_pom(repo, &parent).await?;
            let managed = parse_managed_dependencies(&content)?;
            fill_dangling(&mut deps, &managed);

            match managed.parent {
                Some(grandparent) if has_dangling(&deps) => {
                    tracing::debug!("{} still leaves dangling entries, moving up to {}", parent, grandparent);
                    parent = grandparent;
                }
                _ => return Ok((deps, parent)),
            }
        }

        Err(MavenError::ParentChainTooDeep {
            coordinates: parent.to_string(),
            depth: self.max_parent_depth,
        })
    }
}

/// Replaces every dangling entry that `managed` has a version for.
pub fn fill_dangling(deps: &mut [Coordinate], managed: &ManagedPom) {
    for dep in deps.iter_mut().filter(|d| d.is_dangling()) {
        if let Some(found) = managed.find_managed(dep) {
            dep.version.clone_from(&found.version);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_dangling() {
        let mut deps = vec![
            Coordinate::new("g", "pinned", "1.0"),
            Coordinate::dangling("g", "managed"),
            Coordinate::dangling("g", "unknown"),
        ];
        let managed = ManagedPom {
            managed: vec![
                Coordinate::new("g", "managed", "2.0"),
                Coordinate::new("g", "pinned", "9.9"),
            ],
            parent: None,
        };

        fill_dangling(&mut deps, &managed);
        assert_eq!(deps[0].version.as_deref(), Some("1.0"));
        assert_eq!(deps[1].version.as_deref(), Some("2.0"));
        assert!(deps[2].is_dangling());
    }

    #[test]
    fn test_fill_dangling_first_match_wins() {
        let mut deps = vec![Coordinate::dangling("g", "a")];
        let managed = ManagedPom {
            managed: vec![Coordinate::new("g", "a", "1"), Coordinate::new("g", "a", "2")],
            parent: None,
        };
        fill_dangling(&mut deps, &managed);
        assert_eq!(deps[0].version.as_deref(), Some("1"));
    }
}
