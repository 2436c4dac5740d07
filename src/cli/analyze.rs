use anyhow::{bail, Context, Result};
use std::io::IsTerminal;
use tracing::info;

use crate::config::{Config, Credentials};
use crate::github::parse_repo_url;
use crate::llm::MockLlmClient;
use crate::pipeline::Analyzer;
use crate::render::{render_result, RenderOptions};
use crate::util::SecretString;

pub async fn run(
    url: String,
    config_path: Option<String>,
    model_override: Option<String>,
    json: bool,
    dry_run: bool,
) -> Result<()> {
    let mut config = Config::load_with_path(config_path)?;
    if let Some(model) = model_override {
        info!("CLI override: model = {}", model);
        config.llm.model = model;
    }

    let repo = parse_repo_url(&url, &config.github.web_host)
        .with_context(|| format!("Invalid GitHub URL format: {}", url))?;

    let credentials = Credentials::from_env(&config);
    let Some(token) = credentials.github_token else {
        bail!("{} is not set", config.github.token_env);
    };
    let api_key = match credentials.llm_api_key {
        Some(key) => key,
        None if dry_run => SecretString::new(String::new()),
        None => bail!("{} is not set", config.llm.api_key_env),
    };

    let mut analyzer = Analyzer::from_config(&config, token, api_key)?;
    if dry_run {
        info!("Dry run: using mock LLM client");
        analyzer = analyzer.with_llm_client(Box::new(MockLlmClient::new()));
    }

    let result = analyzer.analyze(&repo).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let opts = RenderOptions {
            color: std::io::stdout().is_terminal(),
            file_badges: analyzer.limits().file_badges,
        };
        let mut out = String::new();
        render_result(&mut out, &result, opts)?;
        print!("{}", out);
    }

    Ok(())
}
