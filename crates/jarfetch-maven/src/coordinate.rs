//! Maven coordinates: `groupId:artifactId[:version]`.

use crate::error::{MavenError, Result};
use std::fmt;
use std::str::FromStr;

/// A `group:artifact:version` triple.
///
/// The version may be absent ("dangling") while it waits to be filled in
/// from a parent's `dependencyManagement`. A dangling coordinate serializes
/// with a trailing colon, e.g. `com.example:util:`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let version = version.into();
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: (!version.is_empty()).then_some(version),
        }
    }

    pub fn dangling(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        self.version.is_none()
    }

    /// "{groupId}:{artifactId}"
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// True when both coordinates name the same artifact, regardless of version.
    pub fn same_artifact(&self, other: &Coordinate) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    fn require_version(&self) -> Result<&str> {
        self.version
            .as_deref()
            .ok_or_else(|| MavenError::DanglingCoordinate {
                coordinates: self.to_string(),
            })
    }

    /// Repository URL of this artifact's POM.
    ///
    /// `{repo}/{group as path}/{artifact}/{version}/{artifact}-{version}.pom`
    pub fn pom_url(&self, repo: &str) -> Result<String> {
        let version = self.require_version()?;
        Ok(format!(
            "{repo}/{group}/{artifact}/{version}/{artifact}-{version}.pom",
            repo = repo.trim_end_matches('/'),
            group = self.group_id.replace('.', "/"),
            artifact = self.artifact_id,
        ))
    }

    /// Repository URL of this artifact's jar, derived from [`Self::pom_url`].
    pub fn jar_url(&self, repo: &str) -> Result<String> {
        let pom = self.pom_url(repo)?;
        let base = pom.strip_suffix(".pom").unwrap_or(&pom);
        Ok(format!("{base}.jar"))
    }

    /// File name of this artifact inside the local jar cache.
    ///
    /// # Errors
    ///
    /// Dangling coordinates have no file name and yield
    /// [`MavenError::DanglingCoordinate`].
    pub fn cache_file_name(&self) -> Result<String> {
        let version = self.require_version()?;
        Ok(format!(
            "{}-{}-{}.jar",
            self.group_id, self.artifact_id, version
        ))
    }
}

impl FromStr for Coordinate {
    type Err = MavenError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || MavenError::MalformedCoordinate {
            coordinates: s.to_string(),
        };

        let parts: Vec<&str> = s.trim().split(':').collect();
        let (group_id, artifact_id, version) = match parts.as_slice() {
            [g, a] => (*g, *a, ""),
            [g, a, v] => (*g, *a, *v),
            _ => return Err(malformed()),
        };
        if group_id.is_empty() || artifact_id.is_empty() {
            return Err(malformed());
        }

        Ok(Self::new(group_id, artifact_id, version))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.version.as_deref().unwrap_or("")
        )
    }
}

pub fn has_dangling(deps: &[Coordinate]) -> bool {
    deps.iter().any(Coordinate::is_dangling)
}
