//! Domain types shared by the POM reader and the resolver.

use crate::coordinate::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MavenScope {
    #[default]
    Compile,
    Test,
    Runtime,
    Provided,
    System,
    Import,
}

impl MavenScope {
    /// Whether a dependency with this scope belongs on the runtime classpath.
    ///
    /// Only `provided` and `test` are excluded; every other scope is kept.
    pub fn is_fetched(&self) -> bool {
        !matches!(self, Self::Provided | Self::Test)
    }
}

impl std::str::FromStr for MavenScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "test" => Self::Test,
            "runtime" => Self::Runtime,
            "provided" => Self::Provided,
            "system" => Self::System,
            "import" => Self::Import,
            _ => Self::Compile,
        })
    }
}

/// Dependencies and parent reference of one POM.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPom {
    pub dependencies: Vec<Coordinate>,
    pub parent: Option<Coordinate>,
}

/// `dependencyManagement` entries of a parent POM, versions already substituted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManagedPom {
    pub managed: Vec<Coordinate>,
    pub parent: Option<Coordinate>,
}

impl ManagedPom {
    /// First versioned managed entry for the same artifact as `dep`.
    pub fn find_managed(&self, dep: &Coordinate) -> Option<&Coordinate> {
        self.managed
            .iter()
            .find(|m| !m.is_dangling() && m.same_artifact(dep))
    }
}
