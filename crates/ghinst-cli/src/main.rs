//! ghinst - install prebuilt binaries from GitHub releases

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ghinst_cli::Cli;
use ghinst_cli::cmd;
use ghinst_cli::ui::Output;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr so stdout stays clean for the result line
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(cli.quiet);

    if cli.purge {
        cmd::purge::purge(&cli, &output)
    } else {
        cmd::install::install(&cli, &output).await
    }
}
