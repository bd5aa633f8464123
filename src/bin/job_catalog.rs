use anyhow::Result;
use clap::Parser;
use job_board::catalog_cli::{handle_catalog_command, CatalogCli};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("job_board=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = CatalogCli::parse();
    handle_catalog_command(cli)
}
