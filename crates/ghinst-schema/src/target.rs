//! `owner/repo[@tag]` install targets.

use std::fmt;

/// Errors that can occur when parsing a [`Target`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// The input is not of the form `owner/repo[@tag]`.
    #[error("invalid target {0:?}: expected owner/repo[@version]")]
    Invalid(String),
}

/// A repository to install from, optionally pinned to a release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Release tag; `None` means the latest release.
    pub tag: Option<String>,
}

impl Target {
    /// Parse `owner/repo` or `owner/repo@tag`.
    ///
    /// The slug is split on the first `@`, then on the first `/`. An empty
    /// tag (`owner/repo@`) is treated as "latest".
    ///
    /// # Errors
    ///
    /// Returns [`TargetError::Invalid`] if the owner or repo is missing.
    ///
    /// # Example
    ///
    /// ```
    /// use ghinst_schema::Target;
    ///
    /// let t = Target::parse("cli/cli@v2.40.0").unwrap();
    /// assert_eq!(t.owner, "cli");
    /// assert_eq!(t.repo, "cli");
    /// assert_eq!(t.tag.as_deref(), Some("v2.40.0"));
    /// ```
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let (slug, tag) = match s.split_once('@') {
            Some((slug, tag)) => (slug, (!tag.is_empty()).then(|| tag.to_string())),
            None => (s, None),
        };

        match slug.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => Ok(Self {
                owner: owner.to_string(),
                repo: repo.to_string(),
                tag,
            }),
            _ => Err(TargetError::Invalid(s.to_string())),
        }
    }

    /// `owner/repo` without the tag.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}/{}@{tag}", self.owner, self.repo),
            None => write!(f, "{}/{}", self.owner, self.repo),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        let cases = [
            ("owner/repo", Some(("owner", "repo", None))),
            ("owner/repo@v1.2.3", Some(("owner", "repo", Some("v1.2.3")))),
            ("owner/repo@", Some(("owner", "repo", None))),
            ("owner/sub/repo", Some(("owner", "sub/repo", None))),
            ("nodash", None),
            ("/repo", None),
            ("owner/", None),
            ("@v1", None),
            ("", None),
        ];

        for (input, want) in cases {
            let got = Target::parse(input);
            match want {
                Some((owner, repo, tag)) => {
                    let t = got.unwrap_or_else(|e| panic!("{input}: {e}"));
                    assert_eq!(t.owner, owner, "{input}");
                    assert_eq!(t.repo, repo, "{input}");
                    assert_eq!(t.tag.as_deref(), tag, "{input}");
                }
                None => assert_eq!(got, Err(TargetError::Invalid(input.to_string()))),
            }
        }
    }

    #[test]
    fn test_display_round_trips() {
        assert_eq!(Target::parse("a/b@v1").unwrap().to_string(), "a/b@v1");
        assert_eq!(Target::parse("a/b").unwrap().to_string(), "a/b");
        assert_eq!(Target::parse("a/b").unwrap().slug(), "a/b");
    }
}
