//! Sleuth CLI - run deep research from the command line
//!
//! `sleuth research "<question>"` prints the answer as JSON on stdout; progress
//! and logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sleuth_core::{init_logging, with_timeout, LoggingConfig, SleuthConfig};
use sleuth_providers::{HttpEvidenceIndex, PerplexitySearch, SiumaiGateway};
use sleuth_research::{
    ResearchConfig, ResearchEngine, ResearchObserver, ResearchProviders, ResearchStage,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "sleuth")]
#[command(about = "Deep research over the web and a local evidence index")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a question and print the cited answer as JSON
    Research {
        /// Question to research
        question: String,

        /// Pretty-print the JSON answer
        #[arg(long)]
        pretty: bool,

        /// Abort the whole run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Manage configuration
    Config {
        /// Write the default configuration to the user config directory
        #[arg(long)]
        init: bool,

        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Validate the effective configuration
        #[arg(long)]
        validate: bool,
    },
}

/// Prints stage transitions to stderr
struct ProgressReporter;

impl ResearchObserver for ProgressReporter {
    fn on_stage(&self, stage: ResearchStage) {
        eprintln!("» {}", stage);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Research {
            question,
            pretty,
            timeout,
        } => {
            let config = SleuthConfig::load(cli.config.as_deref())
                .context("Failed to load configuration")?;
            setup_logging(config.logging.clone(), cli.verbose)?;
            handle_research(&question, pretty, timeout, &config).await?;
        }
        Commands::Config {
            init,
            show,
            validate,
        } => {
            setup_logging(LoggingConfig::default(), cli.verbose)?;
            handle_config(cli.config.as_deref(), init, show, validate).await?;
        }
    }

    Ok(())
}

fn setup_logging(mut logging: LoggingConfig, verbose: bool) -> Result<()> {
    if verbose {
        logging.level = "debug".to_string();
        logging.filter_directives = vec![
            "sleuth_research=debug".to_string(),
            "sleuth_providers=debug".to_string(),
        ];
    }
    init_logging(&logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn handle_research(
    question: &str,
    pretty: bool,
    timeout: Option<u64>,
    config: &SleuthConfig,
) -> Result<()> {
    info!("Starting Sleuth v{}", env!("CARGO_PKG_VERSION"));

    let gateway = SiumaiGateway::new(&config.models)
        .await
        .context("Failed to create completion gateway")?;
    let web_search = PerplexitySearch::new(config.web_search.clone())
        .context("Failed to create web search client")?;
    let evidence_index = HttpEvidenceIndex::new(&config.evidence_index)
        .context("Failed to create evidence index client")?;

    let engine = ResearchEngine::new(
        ResearchConfig::from(config),
        ResearchProviders {
            gateway: Arc::new(gateway),
            web_search: Arc::new(web_search),
            evidence_index: Arc::new(evidence_index),
        },
    )
    .with_observer(Arc::new(ProgressReporter));

    let answer = match timeout {
        Some(secs) => {
            with_timeout(
                engine.conduct_research(question),
                secs.saturating_mul(1000),
                "deep_research",
            )
            .await
            .inspect_err(|e| e.log())?
        }
        None => engine.conduct_research(question).await,
    };

    let output = if pretty {
        serde_json::to_string_pretty(&answer)?
    } else {
        serde_json::to_string(&answer)?
    };
    println!("{}", output);
    Ok(())
}

async fn handle_config(path: Option<&Path>, init: bool, show: bool, validate: bool) -> Result<()> {
    if init {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        SleuthConfig::default().save_to_file(&config_path)?;
        println!("✅ Configuration initialized at: {:?}", config_path);
        println!("📝 Add your API keys or set them in the environment / .env file.");
    }

    if show {
        let config = SleuthConfig::load(path)?;
        println!("{}", toml::to_string_pretty(&config)?);
    }

    if validate {
        match SleuthConfig::load(path) {
            Ok(_) => println!("✅ Configuration is valid"),
            Err(e) => {
                e.log();
                println!("❌ Configuration validation failed: {}", e);
                return Err(e.into());
            }
        }
    }

    if !(init || show || validate) {
        println!("Nothing to do. Use --init, --show or --validate.");
    }

    Ok(())
}

fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
        .context("Could not determine a configuration directory")?;
    Ok(base.join("sleuth").join("config.toml"))
}
