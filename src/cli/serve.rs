use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, Credentials};
use crate::server::{self, AnalyzeService};

pub async fn run(
    bind_override: Option<String>,
    config_path: Option<String>,
    model_override: Option<String>,
) -> Result<()> {
    let (mut config, source) = Config::load_with_source(config_path)?;
    info!("Config: {}", source);

    if let Some(bind) = bind_override {
        info!("CLI override: bind = {}", bind);
        config.server.bind = bind;
    }
    if let Some(model) = model_override {
        info!("CLI override: model = {}", model);
        config.llm.model = model;
    }

    let credentials = Credentials::from_env(&config);
    let service = AnalyzeService::from_config(&config, &credentials)?;
    info!("GitHub API: {}", config.github.api_base);
    info!("LLM: {} via {}", config.llm.model, config.llm.base_url);

    server::serve(Arc::new(service), &config.server.bind).await
}
