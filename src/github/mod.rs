//! Repository metadata from the GitHub REST API.

pub mod client;
pub mod url;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use client::GithubClient;
pub use url::{parse_repo_url, RepoRef};

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected GitHub response: {0}")]
    Decode(String),
}

/// Fields of `GET /repos/{owner}/{name}` the pipeline uses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RepositoryInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueSample {
    pub title: String,
    pub labels: Vec<String>,
}

/// Everything the prompt composer needs, already bounded by `PromptLimits`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryContext {
    pub description: Option<String>,
    pub primary_language: Option<String>,
    pub stars: u64,
    pub languages: BTreeMap<String, u64>,
    pub readme_excerpt: String,
    pub open_issue_count: u64,
    pub sample_issues: Vec<IssueSample>,
    pub top_level_entries: Vec<String>,
}

impl RepositoryContext {
    /// Language names, largest byte count first; ties keep alphabetical order.
    pub fn languages_by_size(&self) -> Vec<&str> {
        let mut langs: Vec<(&String, &u64)> = self.languages.iter().collect();
        langs.sort_by(|a, b| b.1.cmp(a.1));
        langs.into_iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Result of the fan-out fetch for one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySnapshot {
    pub info: RepositoryInfo,
    pub context: RepositoryContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_languages_by_size_orders_descending() {
        let mut ctx = RepositoryContext::default();
        ctx.languages.insert("CSS".to_string(), 100);
        ctx.languages.insert("TypeScript".to_string(), 9000);
        ctx.languages.insert("HTML".to_string(), 100);
        ctx.languages.insert("Rust".to_string(), 500);
        assert_eq!(
            ctx.languages_by_size(),
            vec!["TypeScript", "Rust", "CSS", "HTML"]
        );
    }

    #[test]
    fn test_repository_info_tolerates_missing_fields() {
        let info: RepositoryInfo =
            serde_json::from_str(r#"{"name": "demo", "stargazers_count": 42}"#).unwrap();
        assert_eq!(info.stargazers_count, 42);
        assert!(info.description.is_none());
        assert!(info.html_url.is_none());
    }

    #[test]
    fn test_repository_info_null_description() {
        let info: RepositoryInfo =
            serde_json::from_str(r#"{"name": "demo", "description": null, "language": "Go"}"#)
                .unwrap();
        assert!(info.description.is_none());
        assert_eq!(info.language.as_deref(), Some("Go"));
    }
}
