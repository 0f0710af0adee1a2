//! vaultup CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vaultup_cli::{Cli, Commands, cmd, version_or_default};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.settings.load()?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Install { version, target } => {
            let version = version_or_default(version.as_deref(), &config);
            cmd::install::install(&config, version, target.platform(), quiet).await
        }
        Commands::Remove { version } => {
            let version = version_or_default(version.as_deref(), &config);
            cmd::remove::remove(&config, &version, quiet).await
        }
        Commands::Resolve {
            version,
            target,
            json,
        } => {
            let version = version_or_default(version.as_deref(), &config);
            cmd::resolve::resolve(&config, &version, target.os(), target.raw_arch(), json)
        }
        Commands::Checksums { os, json } => cmd::checksums::checksums(&config, os, json),
    }
}
