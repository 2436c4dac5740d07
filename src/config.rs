use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::util::SecretString;

const LOCAL_CONFIG_FILE: &str = "firstpatch.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub limits: PromptLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to (default: "127.0.0.1:8787")
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// REST API root (default: "https://api.github.com")
    #[serde(default = "default_github_api_base")]
    pub api_base: String,

    /// Host accepted in repository URLs (default: "github.com")
    #[serde(default = "default_web_host")]
    pub web_host: String,

    /// Environment variable holding the access token (default: "GITHUB_TOKEN")
    #[serde(default = "default_github_token_env")]
    pub token_env: String,

    /// Optional request timeout. Unset means the HTTP client default (none).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_github_api_base(),
            web_host: default_web_host(),
            token_env: default_github_token_env(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible gateway root; "/chat/completions" is appended
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Environment variable holding the gateway API key (default: "AI_API_KEY")
    #[serde(default = "default_llm_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output-token ceiling for the completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key_env: default_llm_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

/// Size bounds that keep the LLM call within token and cost limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptLimits {
    /// README characters included in the prompt
    #[serde(default = "default_readme_chars")]
    pub readme_chars: usize,

    /// Open issues included in the prompt sample
    #[serde(default = "default_sample_issues")]
    pub sample_issues: usize,

    /// Top-level directory entries included in the prompt
    #[serde(default = "default_top_level_entries")]
    pub top_level_entries: usize,

    /// `per_page` for the open-issues request
    #[serde(default = "default_issues_page_size")]
    pub issues_page_size: usize,

    /// File badges shown per suggestion before the "+N more" suffix
    #[serde(default = "default_file_badges")]
    pub file_badges: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            readme_chars: default_readme_chars(),
            sample_issues: default_sample_issues(),
            top_level_entries: default_top_level_entries(),
            issues_page_size: default_issues_page_size(),
            file_badges: default_file_badges(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_web_host() -> String {
    "github.com".to_string()
}

fn default_github_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_llm_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1".to_string()
}

fn default_llm_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_llm_api_key_env() -> String {
    "AI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_readme_chars() -> usize {
    3000
}

fn default_sample_issues() -> usize {
    5
}

fn default_top_level_entries() -> usize {
    20
}

fn default_issues_page_size() -> usize {
    10
}

fn default_file_badges() -> usize {
    3
}

/// Where a loaded configuration came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    User(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Local(p) | ConfigSource::User(p) => {
                write!(f, "{}", p.display())
            }
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl Config {
    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        Self::load_with_source(path).map(|(config, _)| config)
    }

    /// Like [`Config::load_with_path`], also reporting which file was used.
    pub fn load_with_source(path: Option<String>) -> Result<(Self, ConfigSource)> {
        // An explicit path must load; search paths fall through silently.
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            let config = Self::load_from_path(&config_path)
                .with_context(|| format!("failed to load config from {}", config_path))?;
            return Ok((config, ConfigSource::Explicit(PathBuf::from(config_path))));
        }

        if Path::new(LOCAL_CONFIG_FILE).exists() {
            let config = Self::load_from_path(LOCAL_CONFIG_FILE)
                .with_context(|| format!("failed to load ./{}", LOCAL_CONFIG_FILE))?;
            debug!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
            return Ok((config, ConfigSource::Local(PathBuf::from(LOCAL_CONFIG_FILE))));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("firstpatch").join("config.toml");
            if config_path.exists() {
                let config = Self::load_from_path(&config_path)
                    .with_context(|| format!("failed to load {}", config_path.display()))?;
                debug!("Loaded config from {:?}", config_path);
                return Ok((config, ConfigSource::User(config_path)));
            }
        }

        debug!("Using default config");
        Ok((Self::default(), ConfigSource::Defaults))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Secrets resolved once at startup from the environment variables named in [`Config`].
///
/// An unset or empty variable is recorded as absent; the service reports a
/// configuration error for every analysis request until both are present.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub github_token: Option<SecretString>,
    pub llm_api_key: Option<SecretString>,
}

impl Credentials {
    pub fn from_env(config: &Config) -> Self {
        Self {
            github_token: read_secret(&config.github.token_env),
            llm_api_key: read_secret(&config.llm.api_key_env),
        }
    }

    pub fn new(github_token: impl Into<String>, llm_api_key: impl Into<String>) -> Self {
        Self {
            github_token: Some(SecretString::new(github_token.into())),
            llm_api_key: Some(SecretString::new(llm_api_key.into())),
        }
    }

    /// Both secrets, or `None` when either is missing.
    pub fn pair(&self) -> Option<(&SecretString, &SecretString)> {
        self.github_token.as_ref().zip(self.llm_api_key.as_ref())
    }
}

fn read_secret(var: &str) -> Option<SecretString> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1:8787");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.llm.api_key_env, "AI_API_KEY");
        assert_eq!(config.llm.model, "google/gemini-2.5-flash");
        assert_eq!(config.llm.max_tokens, 2000);
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.llm.timeout_secs.is_none());
    }

    #[test]
    fn test_default_limits() {
        let limits = PromptLimits::default();
        assert_eq!(limits.readme_chars, 3000);
        assert_eq!(limits.sample_issues, 5);
        assert_eq!(limits.top_level_entries, 20);
        assert_eq!(limits.issues_page_size, 10);
        assert_eq!(limits.file_badges, 3);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("GITHUB_TOKEN"));
        assert!(toml_str.contains("readme_chars = 3000"));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[llm]
model = "openai/gpt-4o-mini"

[limits]
readme_chars = 1200
"#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "openai/gpt-4o-mini");
        assert_eq!(config.llm.max_tokens, 2000);
        assert_eq!(config.limits.readme_chars, 1200);
        assert_eq!(config.limits.sample_issues, 5);
        assert_eq!(config.github.web_host, "github.com");
    }

    #[test]
    fn test_credentials_new_has_pair() {
        let creds = Credentials::new("gh", "llm");
        let (gh, llm) = creds.pair().unwrap();
        assert_eq!(llm.expose(), "llm");
        assert_eq!(gh.expose(), "gh");
        assert_eq!(creds.github_token.unwrap().expose(), "gh");
    }

    #[test]
    fn test_credentials_missing_secret_has_no_pair() {
        assert!(Credentials::default().pair().is_none());
        let half = Credentials {
            github_token: Some("gh".into()),
            llm_api_key: None,
        };
        assert!(half.pair().is_none());
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Defaults.to_string(), "built-in defaults");
        assert_eq!(
            ConfigSource::Local(PathBuf::from("firstpatch.toml")).to_string(),
            "firstpatch.toml"
        );
    }
}
