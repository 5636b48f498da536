//! Maven artifact resolution and jar fetching.
//!
//! Given root coordinates such as `org.apache.commons:commons-lang3:3.14.0`,
//! this crate downloads each root's POM, fills versions left out of its
//! dependency declarations from the parent chain's `dependencyManagement`,
//! and downloads the resulting jars into a flat local cache.
//!
//! ```no_run
//! use jarfetch_maven::{FetcherConfig, MavenFetcher};
//!
//! # async fn run() -> jarfetch_maven::Result<()> {
//! let mut fetcher = MavenFetcher::new(FetcherConfig::default())?;
//! fetcher.add_repository("https://maven.google.com");
//! let report = fetcher.fetch_jars(&["org.apache.commons:commons-lang3:3.14.0"]).await?;
//! println!("fetched {} jar(s)", report.fetched);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinate;
pub mod error;
pub mod fetcher;
pub mod pom;
pub mod repository;
pub mod resolver;
pub mod types;
pub mod xml;

pub use config::{DEFAULT_CONCURRENCY, FetcherConfig, MAVEN_CENTRAL};
pub use coordinate::Coordinate;
pub use error::{MavenError, Result};
pub use fetcher::{FetchReport, MavenFetcher};
pub use pom::{parse_dependencies, parse_managed_dependencies};
pub use repository::RepositoryList;
pub use resolver::DependencyResolver;
pub use types::{ManagedPom, MavenScope, ParsedPom};
