//! Errors specific to Maven resolution and jar fetching.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Invalid Maven coordinates '{coordinates}': expected 'groupId:artifactId[:version]'")]
    MalformedCoordinate { coordinates: String },

    #[error("Coordinate '{coordinates}' has no version")]
    DanglingCoordinate { coordinates: String },

    #[error("Failed to parse pom.xml: {message}")]
    PomParse { message: String },

    #[error("Property '${{{property}}}' is not declared in <properties>")]
    PropertyResolution { property: String },

    #[error("No configured repository serves '{coordinates}'")]
    RepositoryUnavailable { coordinates: String },

    #[error("Failed to fetch '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: jarfetch_core::CoreError,
    },

    #[error("Cache root '{}' exists but is not a directory", path.display())]
    InvalidCacheRoot { path: PathBuf },

    #[error("Parent chain of '{coordinates}' exceeds {depth} levels")]
    ParentChainTooDeep { coordinates: String, depth: usize },

    #[error("Failed to resolve '{coordinates}': {source}")]
    Resolution {
        coordinates: String,
        #[source]
        source: Box<MavenError>,
    },

    #[error("Failed to load jar: {0}")]
    Load(#[source] jarfetch_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MavenError>;

impl MavenError {
    pub(crate) fn pom_parse(message: impl Into<String>) -> Self {
        Self::PomParse {
            message: message.into(),
        }
    }

    /// Wraps `self` with the root coordinate whose resolution it aborted.
    pub(crate) fn in_resolution_of(self, coordinates: impl Into<String>) -> Self {
        Self::Resolution {
            coordinates: coordinates.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping `Resolution` wrappers.
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Resolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<jarfetch_core::CoreError> for MavenError {
    fn from(err: jarfetch_core::CoreError) -> Self {
        use jarfetch_core::CoreError;
        match err {
            CoreError::InvalidCacheRoot { path } => Self::InvalidCacheRoot { path },
            CoreError::Io(e) => Self::Io(e),
            e @ (CoreError::InvalidJar { .. } | CoreError::IncompatibleLoader { .. }) => {
                Self::Load(e)
            }
            CoreError::Http { url, source } => Self::Fetch {
                url: url.clone(),
                source: CoreError::Http { url, source },
            },
            CoreError::Status { url, status } => Self::Fetch {
                url: url.clone(),
                source: CoreError::Status { url, status },
            },
        }
    }
}
