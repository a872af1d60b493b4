//! ghinst - install prebuilt binaries from GitHub releases
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]
//!
//! Resolves a release, picks the asset built for this machine, extracts the
//! executable and links it into `<root>/bin`.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.ghinst/
//! ├── bin/                  # Symlinks to installed executables
//! └── <owner>/
//!     └── <repo>@<tag>/     # One directory per installed version
//! ```

pub mod cmd;
pub mod ops;
pub mod ui;

pub use ghinst_core::USER_AGENT;
pub use ghinst_core::registry::DEFAULT_API_URL;

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ghinst")]
#[command(author, version = env!("GHINST_VERSION"), about = "Install prebuilt binaries from GitHub releases")]
pub struct Cli {
    /// Release to install: owner/repo or owner/repo@tag
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Remove every installed version of the package except the newest
    #[arg(short, long)]
    pub purge: bool,

    /// Install root (default: ~/.ghinst)
    #[arg(short = 'd', long, env = "GHINST_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// Bearer token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GHINST_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["ghinst", "-p", "-d", "/tmp/x", "-q", "cli/cli@v2"]).unwrap();
        assert!(cli.purge);
        assert!(cli.quiet);
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/x")));
        assert_eq!(cli.target, "cli/cli@v2");
    }

    #[test]
    fn test_target_is_required() {
        assert!(Cli::try_parse_from(["ghinst"]).is_err());
    }
}
