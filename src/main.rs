use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use firstpatch::cli;

#[derive(Parser)]
#[command(name = "firstpatch", version)]
#[command(about = "Find good first contributions in GitHub repositories", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the analysis endpoint and browser UI
    Serve {
        /// Address to bind (e.g., "0.0.0.0:8787")
        #[arg(long)]
        bind: Option<String>,

        /// Path to config file (defaults to ./firstpatch.toml or ~/.config/firstpatch/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Override LLM model (e.g., "google/gemini-2.5-flash")
        #[arg(long)]
        model: Option<String>,
    },

    /// Analyze one repository and print the suggestions
    Analyze {
        /// Repository URL (e.g., https://github.com/owner/repo)
        url: String,

        #[arg(long)]
        config: Option<String>,

        #[arg(long)]
        model: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Use mock LLM client for testing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate configuration and credentials
    Check {
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve {
            bind,
            config,
            model,
        } => cli::serve::run(bind, config, model).await?,
        Commands::Analyze {
            url,
            config,
            model,
            json,
            dry_run,
        } => cli::analyze::run(url, config, model, json, dry_run).await?,
        Commands::Check { config } => cli::check::run(config)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["firstpatch", "serve"]).unwrap();
        assert!(!cli.verbose);
        match cli.command {
            Commands::Serve {
                bind,
                config,
                model,
            } => {
                assert!(bind.is_none());
                assert!(config.is_none());
                assert!(model.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_serve_with_all_args() {
        let cli = Cli::try_parse_from([
            "firstpatch",
            "serve",
            "--bind",
            "0.0.0.0:9000",
            "--config",
            "fp.toml",
            "--model",
            "gpt-4o-mini",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve {
                bind,
                config,
                model,
            } => {
                assert_eq!(bind.unwrap(), "0.0.0.0:9000");
                assert_eq!(config.unwrap(), "fp.toml");
                assert_eq!(model.unwrap(), "gpt-4o-mini");
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "firstpatch",
            "analyze",
            "https://github.com/octo/demo",
            "--json",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                url, json, dry_run, ..
            } => {
                assert_eq!(url, "https://github.com/octo/demo");
                assert!(json);
                assert!(dry_run);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_parse_analyze_requires_url() {
        assert!(Cli::try_parse_from(["firstpatch", "analyze"]).is_err());
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["firstpatch", "check", "--config", "x.toml"]).unwrap();
        match cli.command {
            Commands::Check { config } => assert_eq!(config.unwrap(), "x.toml"),
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_missing_subcommand() {
        assert!(Cli::try_parse_from(["firstpatch"]).is_err());
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        assert!(Cli::try_parse_from(["firstpatch", "generate"]).is_err());
    }
}
