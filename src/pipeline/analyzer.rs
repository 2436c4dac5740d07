use tracing::{error, info, warn};

use super::normalizer;
use crate::config::{Config, PromptLimits};
use crate::error::AnalyzeError;
use crate::github::{GithubClient, RepoRef, RepositoryInfo};
use crate::llm::client::LlmClient;
use crate::llm::client_impl::ChatCompletionsClient;
use crate::llm::prompts;
use crate::model::{AnalysisResult, RepositorySummary};
use crate::util::SecretString;

/// Runs one analysis: fetch metadata, compose the prompt, generate, normalize.
pub struct Analyzer {
    github: GithubClient,
    llm: Box<dyn LlmClient>,
    limits: PromptLimits,
    web_host: String,
}

impl Analyzer {
    pub fn new(
        github: GithubClient,
        llm: Box<dyn LlmClient>,
        limits: PromptLimits,
        web_host: impl Into<String>,
    ) -> Self {
        Self {
            github,
            llm,
            limits,
            web_host: web_host.into(),
        }
    }

    /// Build the production pipeline from configuration and resolved secrets.
    pub fn from_config(
        config: &Config,
        github_token: SecretString,
        llm_api_key: SecretString,
    ) -> anyhow::Result<Self> {
        let github = GithubClient::new(&config.github, github_token, config.limits.clone())?;
        let llm = ChatCompletionsClient::new(&config.llm, llm_api_key)?;
        Ok(Self::new(
            github,
            Box::new(llm),
            config.limits.clone(),
            config.github.web_host.clone(),
        ))
    }

    /// Replace the LLM client (used by `--dry-run`).
    pub fn with_llm_client(mut self, llm: Box<dyn LlmClient>) -> Self {
        self.llm = llm;
        self
    }

    pub fn limits(&self) -> &PromptLimits {
        &self.limits
    }

    pub async fn analyze(&self, repo: &RepoRef) -> Result<AnalysisResult, AnalyzeError> {
        info!("Analyzing repository: {}", repo);

        let snapshot = self.github.fetch_repository(repo).await.map_err(|e| {
            error!("{}: repository lookup failed: {}", repo, e);
            AnalyzeError::from(e)
        })?;

        let prompt = prompts::compose(repo, &snapshot.context, &self.limits);

        let text = self.llm.complete(&prompt).await.map_err(|e| {
            error!("{}: suggestion generation failed: {}", repo, e);
            AnalyzeError::from(e)
        })?;

        let normalized = normalizer::normalize(&text);
        if normalized.is_degraded() {
            warn!("{}: returning unstructured model output", repo);
        }
        let suggestions = normalized.into_suggestions();

        info!("{}: {} suggestions", repo, suggestions.len());

        Ok(AnalysisResult {
            repository: self.summary(repo, &snapshot.info),
            suggestions,
        })
    }

    fn summary(&self, repo: &RepoRef, info: &RepositoryInfo) -> RepositorySummary {
        let url = info
            .html_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/{}/{}", self.web_host, repo.owner, repo.name));
        RepositorySummary {
            owner: repo.owner.clone(),
            name: repo.name.clone(),
            description: info.description.clone(),
            stars: info.stargazers_count,
            language: info.language.clone(),
            url,
        }
    }
}
