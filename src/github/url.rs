//! Repository URL parsing.
//!
//! Accepted shapes (host configurable, scheme optional):
//!   https://github.com/owner/name
//!   github.com/owner/name.git
//!   https://github.com/owner/name/tree/main/src?tab=readme

use std::fmt;

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse `host/owner/name[.git]` out of `url`. Returns `None` when the host is
/// absent or either segment is empty.
pub fn parse_repo_url(url: &str, host: &str) -> Option<RepoRef> {
    let url = url.trim();
    // ASCII lowering keeps byte offsets aligned with `url`.
    let needle = format!("{}/", host.to_ascii_lowercase());
    let start = url.to_ascii_lowercase().find(&needle)? + needle.len();
    let rest = &url[start..];

    // Drop query and fragment before splitting into path segments.
    let path = rest.split(['?', '#']).next().unwrap_or("");
    let mut segments = path.split('/');

    let owner = segments.next().unwrap_or("").trim();
    let raw_name = segments.next().unwrap_or("").trim();
    let name = raw_name.strip_suffix(".git").unwrap_or(raw_name);

    if owner.is_empty() || name.is_empty() || !is_valid_segment(owner) || !is_valid_segment(name)
    {
        return None;
    }

    Some(RepoRef::new(owner, name))
}

/// Segments end up in API paths, so only characters GitHub allows in
/// owner and repository names pass.
fn is_valid_segment(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && segment != "."
        && segment != ".."
}
