mod cli;

use clap::Parser;
use cli::{Cli, CliError, Command};
use jarfetch_core::ClasspathCollector;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let fetcher = cli.fetcher()?;

    match cli.command {
        Command::Fetch { coordinates } => {
            let report = fetcher.fetch_jars(coordinates.as_slice()).await?;
            println!(
                "fetched {}, already cached {}, failed {}",
                report.fetched,
                report.already_cached,
                report.failed.len()
            );
            for coordinate in &report.failed {
                println!("  failed: {coordinate}");
            }
            if !report.failed.is_empty() {
                return Err(CliError::Incomplete {
                    failed: report.failed.len(),
                });
            }
        }
        Command::Classpath { coordinates } => {
            let mut collector = ClasspathCollector::new();
            if coordinates.is_empty() {
                fetcher.load_jars(&mut collector).await?;
            } else {
                fetcher
                    .fetch_and_load_jars(coordinates.as_slice(), &mut collector)
                    .await?;
            }
            println!("{}", collector.classpath()?);
        }
    }
    Ok(())
}
