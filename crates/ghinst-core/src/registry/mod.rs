//! Release registries.

pub mod github;

pub use github::{DEFAULT_API_URL, GithubClient, RegistryError};
