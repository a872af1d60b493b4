//! GitHub release API interaction

use ghinst_schema::{Release, Target};
use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("release not found for {0}")]
    NotFound(String),

    #[error("GitHub API returned {status} for {target}")]
    Upstream { target: String, status: StatusCode },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the releases endpoints of a GitHub-compatible API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    /// Anonymous unless `token` is given, in which case it is sent as a bearer credential.
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_URL.to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Point at another API host (GitHub Enterprise, test servers).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Endpoint for the target's pinned tag, or for the latest release.
    pub fn release_url(&self, target: &Target) -> String {
        match &target.tag {
            Some(tag) => format!(
                "{}/repos/{}/{}/releases/tags/{tag}",
                self.api_base, target.owner, target.repo
            ),
            None => format!(
                "{}/repos/{}/{}/releases/latest",
                self.api_base, target.owner, target.repo
            ),
        }
    }

    /// Fetch release metadata for `target`.
    pub async fn fetch_release(&self, target: &Target) -> Result<Release, RegistryError> {
        let url = self.release_url(target);
        debug!(%url, authenticated = self.token.is_some(), "fetching release");

        let response = self.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(RegistryError::NotFound(target.to_string())),
            status if !status.is_success() => Err(RegistryError::Upstream {
                target: target.to_string(),
                status,
            }),
            _ => {
                let release: Release = response.json().await?;
                info!(target = %target, tag = %release.tag_name, assets = release.assets.len(), "resolved release");
                Ok(release)
            }
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
