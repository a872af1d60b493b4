//! Shared installation context.
//!
//! Groups the install root, the registry client and the reporter so the
//! operations take one argument instead of four.

use std::fmt;
use std::sync::Arc;

use ghinst_core::Layout;
use ghinst_core::Reporter;
use ghinst_core::registry::GithubClient;
use ghinst_core::select::SelectError;
use ghinst_schema::Platform;

use super::InstallError;
use crate::Cli;

#[derive(Clone)]
pub struct Context {
    pub layout: Layout,
    pub github: GithubClient,
    /// Platform assets are selected for.
    pub platform: Platform,
    pub reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(
        layout: Layout,
        github: GithubClient,
        platform: Platform,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            layout,
            github,
            platform,
            reporter,
        }
    }

    /// Build the context for the running machine from parsed arguments and
    /// environment.
    ///
    /// Fails with an unsupported-platform error when this build target is
    /// outside the alias table, before any network access.
    pub fn from_cli(cli: &Cli, reporter: Arc<dyn Reporter>) -> Result<Self, InstallError> {
        let platform = Platform::current().map_err(SelectError::from)?;
        let layout = resolve_layout(cli)?;
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()
            .map_err(|e| InstallError::context("Failed to build HTTP client", e))?;
        let github = GithubClient::new(client, cli.token.clone()).with_api_base(&cli.api_url);
        Ok(Self::new(layout, github, platform, reporter))
    }
}

/// `--root`/`GHINST_ROOT` if given, otherwise `~/.ghinst`.
pub fn resolve_layout(cli: &Cli) -> Result<Layout, InstallError> {
    cli.root
        .clone()
        .or_else(ghinst_core::try_default_root)
        .map(Layout::new)
        .ok_or_else(|| {
            InstallError::context("Failed to resolve install root", "home directory not found")
        })
}
