use anyhow::Context;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GithubError, IssueSample, RepoRef, RepositoryContext, RepositoryInfo, RepositorySnapshot};
use crate::config::{GithubConfig, PromptLimits};
use crate::util::{truncate_chars, SecretString};

const USER_AGENT: &str = concat!("firstpatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ReadmeResponse {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    labels: Vec<LabelResponse>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
}

/// Read-only GitHub REST client. One instance is shared by all requests.
pub struct GithubClient {
    api_base: String,
    token: SecretString,
    limits: PromptLimits,
    client: Client,
}

impl GithubClient {
    pub fn new(
        config: &GithubConfig,
        token: SecretString,
        limits: PromptLimits,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token,
            limits,
            client: builder.build().context("failed to build HTTP client")?,
        })
    }

    /// Fetch repository info plus the four secondary resources concurrently.
    ///
    /// Only a failed repository-info call is an error. README, languages,
    /// issues and contents fall back to empty values when unavailable.
    pub async fn fetch_repository(
        &self,
        repo: &RepoRef,
    ) -> Result<RepositorySnapshot, GithubError> {
        debug!("Fetching GitHub metadata for {}", repo);

        let (info, readme, languages, issues, contents) = tokio::join!(
            self.repository_info(repo),
            self.readme(repo),
            self.languages(repo),
            self.open_issues(repo),
            self.top_level_entries(repo),
        );

        let info = info?;
        let readme = or_default(repo, "README", readme);
        let languages = or_default(repo, "languages", languages);
        let issues = or_default(repo, "issues", issues);
        let contents = or_default(repo, "contents", contents);

        let context = RepositoryContext {
            description: info.description.clone(),
            primary_language: info.language.clone(),
            stars: info.stargazers_count,
            languages,
            readme_excerpt: truncate_chars(&readme, self.limits.readme_chars).to_string(),
            open_issue_count: info.open_issues_count,
            sample_issues: issues
                .into_iter()
                .take(self.limits.sample_issues)
                .collect(),
            top_level_entries: contents
                .into_iter()
                .take(self.limits.top_level_entries)
                .collect(),
        };

        Ok(RepositorySnapshot { info, context })
    }

    pub async fn repository_info(&self, repo: &RepoRef) -> Result<RepositoryInfo, GithubError> {
        self.get_json(&format!("/repos/{}/{}", repo.owner, repo.name))
            .await
    }

    pub async fn readme(&self, repo: &RepoRef) -> Result<String, GithubError> {
        let readme: ReadmeResponse = self
            .get_json(&format!("/repos/{}/{}/readme", repo.owner, repo.name))
            .await?;
        decode_readme(&readme)
    }

    pub async fn languages(&self, repo: &RepoRef) -> Result<BTreeMap<String, u64>, GithubError> {
        self.get_json(&format!("/repos/{}/{}/languages", repo.owner, repo.name))
            .await
    }

    pub async fn open_issues(&self, repo: &RepoRef) -> Result<Vec<IssueSample>, GithubError> {
        let issues: Vec<IssueResponse> = self
            .get_json(&format!(
                "/repos/{}/{}/issues?state=open&per_page={}",
                repo.owner, repo.name, self.limits.issues_page_size
            ))
            .await?;
        Ok(issues
            .into_iter()
            .map(|issue| IssueSample {
                title: issue.title,
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
            })
            .collect())
    }

    pub async fn top_level_entries(&self, repo: &RepoRef) -> Result<Vec<String>, GithubError> {
        let entries: Vec<ContentEntry> = self
            .get_json(&format!("/repos/{}/{}/contents", repo.owner, repo.name))
            .await?;
        Ok(entries.into_iter().map(|e| e.name).collect())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GithubError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {}", self.token.expose()))
            .header("accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                body: truncate_chars(&body, 200).to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| GithubError::Decode(format!("{}: {}", path, e)))
    }
}

/// Decode the README payload. GitHub wraps base64 content at 60 columns.
fn decode_readme(readme: &ReadmeResponse) -> Result<String, GithubError> {
    match readme.encoding.as_deref() {
        None | Some("base64") => {
            let cleaned: String = readme
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(cleaned)
                .map_err(|e| GithubError::Decode(format!("README base64: {}", e)))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Some(_) => Ok(readme.content.clone()),
    }
}

fn or_default<T: Default>(repo: &RepoRef, what: &str, result: Result<T, GithubError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{}: {} unavailable, continuing without it: {}", repo, what, e);
            T::default()
        }
    }
}
