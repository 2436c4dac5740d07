use anyhow::Result;
use std::env;

use crate::config::Config;

struct CheckResult {
    passed: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl CheckResult {
    fn new() -> Self {
        Self {
            passed: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn pass(&mut self, msg: impl Into<String>) {
        self.passed.push(msg.into());
    }

    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }
}

pub fn run(config_path: Option<String>) -> Result<()> {
    let mut results = CheckResult::new();

    // Load failures are reported in the summary rather than propagated.
    let config = match Config::load_with_source(config_path) {
        Ok((config, source)) => {
            results.pass(format!("Config loaded from {}", source));
            config
        }
        Err(e) => {
            results.error(format!("Failed to load config: {:#}", e));
            print_results(&results);
            return Ok(());
        }
    };

    check_config(&config, &mut results);
    print_results(&results);

    if !results.errors.is_empty() {
        anyhow::bail!("{} config error(s) found", results.errors.len());
    }

    Ok(())
}

fn check_config(config: &Config, results: &mut CheckResult) {
    results.pass(format!("Listener: {}", config.server.bind));

    check_url("GitHub API", &config.github.api_base, results);
    results.pass(format!("Repository host: {}", config.github.web_host));
    check_env("GitHub token", &config.github.token_env, results);

    check_url("LLM gateway", &config.llm.base_url, results);
    results.pass(format!(
        "LLM model: {} (temperature {}, max_tokens {})",
        config.llm.model, config.llm.temperature, config.llm.max_tokens
    ));
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        results.warn(format!(
            "temperature {} is outside the usual 0.0-2.0 range",
            config.llm.temperature
        ));
    }
    if config.llm.max_tokens == 0 {
        results.error("max_tokens must be greater than 0");
    }
    check_env("LLM API key", &config.llm.api_key_env, results);

    let limits = &config.limits;
    results.pass(format!(
        "Prompt limits: readme_chars={}, sample_issues={}, top_level_entries={}",
        limits.readme_chars, limits.sample_issues, limits.top_level_entries
    ));
    if limits.issues_page_size < limits.sample_issues {
        results.warn(format!(
            "issues_page_size {} is smaller than sample_issues {}",
            limits.issues_page_size, limits.sample_issues
        ));
    }
}

fn check_url(label: &str, url: &str, results: &mut CheckResult) {
    if url.starts_with("https://") || url.starts_with("http://") {
        results.pass(format!("{}: {}", label, url));
    } else {
        results.error(format!("{}: '{}' is not an http(s) URL", label, url));
    }
}

fn check_env(label: &str, var: &str, results: &mut CheckResult) {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => results.pass(format!("{}: {} is set", label, var)),
        Ok(_) => results.error(format!("{}: {} is set but empty", label, var)),
        Err(_) => results.error(format!("{}: {} is not set", label, var)),
    }
}

fn print_results(results: &CheckResult) {
    println!();
    for msg in &results.passed {
        println!("  \u{2713} {}", msg);
    }
    for msg in &results.warnings {
        println!("  ! {}", msg);
    }
    for msg in &results.errors {
        println!("  \u{2717} {}", msg);
    }
    println!();
    println!(
        "{} passed, {} warnings, {} errors",
        results.passed.len(),
        results.warnings.len(),
        results.errors.len()
    );
}
