//! Command-line arguments and their mapping onto [`FetcherConfig`].

use clap::{Parser, Subcommand};
use jarfetch_maven::{FetcherConfig, MavenError, MavenFetcher};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "jarfetch", version, about)]
pub(crate) struct Cli {
    /// Extra repository URL; repeat to add several, first has highest priority.
    /// Accepted before the subcommand only.
    #[arg(long = "repo", value_name = "URL")]
    pub(crate) repos: Vec<String>,

    /// Local jar cache directory.
    #[arg(long, env = "JARFETCH_CACHE_DIR", value_name = "DIR", global = true)]
    pub(crate) cache_dir: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Maximum concurrent downloads.
    #[arg(long, value_name = "N", global = true)]
    pub(crate) concurrency: Option<usize>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Fetch artifacts and their dependencies into the cache.
    Fetch {
        /// Coordinates as groupId:artifactId:version.
        #[arg(required = true, value_name = "COORD")]
        coordinates: Vec<String>,
    },
    /// Print the classpath of every cached jar, fetching COORDs first.
    Classpath {
        #[arg(value_name = "COORD")]
        coordinates: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub(crate) enum CliError {
    #[error("Failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{failed} jar(s) could not be fetched")]
    Incomplete { failed: usize },

    #[error(transparent)]
    Maven(#[from] MavenError),

    #[error(transparent)]
    Core(#[from] jarfetch_core::CoreError),
}

fn load_config(path: &Path) -> Result<FetcherConfig, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl Cli {
    /// Builds the fetcher configuration: file (or defaults), then flags.
    pub(crate) fn fetcher_config(&self) -> Result<FetcherConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FetcherConfig::default(),
        };

        if let Some(dir) = &self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }
        Ok(config)
    }

    /// Fetcher with every `--repo` ahead of the configured repositories,
    /// in the order given.
    pub(crate) fn fetcher(&self) -> Result<MavenFetcher, CliError> {
        let mut fetcher = MavenFetcher::new(self.fetcher_config()?)?;
        for repo in self.repos.iter().rev() {
            fetcher.add_repository(repo.as_str());
        }
        Ok(fetcher)
    }
}
