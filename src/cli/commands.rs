//! CLI command definitions for campaign-forge.
//!
//! `generate` runs one generation (plus optional chained refinements) and
//! prints the Markdown; `interactive` runs the generate/refine/rate loop.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use crate::config::AppConfig;
use crate::content::{GenerationRequest, TaskType};
use crate::feedback::FeedbackLog;
use crate::llm::{ChatClient, LlmProvider};
use crate::session::{AgentSession, SessionOptions};

use super::interactive::InteractiveShell;

/// Marketing content generator backed by a hosted LLM.
#[derive(Parser)]
#[command(name = "campaign-forge")]
#[command(about = "Generate and refine marketing content with an LLM")]
#[command(version)]
#[command(
    long_about = "campaign-forge turns a product, target audience and marketing objective into \
campaign ideas, ad copy or product descriptions, then revises the result on request.\n\n\
Example usage:\n  campaign-forge generate -s \"Reusable water bottle\" -a \"Eco-conscious students\" \
-o \"Raise brand awareness\" --refine \"make it shorter and funnier\""
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate content once and print it.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate, refine and rate content in an interactive loop.
    #[command(alias = "repl")]
    Interactive(InteractiveArgs),
}

/// Oracle and storage overrides shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OracleArgs {
    /// Model identifier (overrides CAMPAIGN_FORGE_MODEL).
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// API key (can also be set via CAMPAIGN_FORGE_API_KEY or OPENROUTER_API_KEY).
    #[arg(long, env = "CAMPAIGN_FORGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL (overrides CAMPAIGN_FORGE_API_BASE).
    #[arg(long)]
    pub api_base: Option<String>,

    /// Sampling temperature, 0.0-2.0 (overrides CAMPAIGN_FORGE_TEMPERATURE).
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Feedback log file (overrides CAMPAIGN_FORGE_FEEDBACK_PATH).
    #[arg(long)]
    pub feedback_path: Option<PathBuf>,
}

impl OracleArgs {
    /// Apply CLI overrides on top of environment configuration.
    pub fn apply(&self, mut config: AppConfig) -> anyhow::Result<AppConfig> {
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(ref key) = self.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(ref base) = self.api_base {
            config = config.with_api_base(base.trim_end_matches('/').to_string());
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(ref path) = self.feedback_path {
            config = config.with_feedback_path(path.clone());
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Arguments for `campaign-forge generate`.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Product or service to market.
    #[arg(short = 's', long)]
    pub subject: String,

    /// Target audience.
    #[arg(short = 'a', long)]
    pub audience: String,

    /// Marketing objective.
    #[arg(short = 'o', long)]
    pub objective: String,

    /// Task type: campaign-idea, ad-copy or product-description.
    #[arg(short = 't', long, default_value = "campaign-idea")]
    pub task: TaskType,

    /// Refinement instruction applied after generation. Repeat to chain.
    #[arg(short = 'r', long = "refine")]
    pub refinements: Vec<String>,

    /// Rate the final result (1-5) and append it to the feedback log.
    #[arg(long)]
    pub rating: Option<i64>,

    /// Optional comment stored with --rating.
    #[arg(long, requires = "rating")]
    pub comment: Option<String>,

    /// Print the final result as JSON instead of Markdown.
    #[arg(short = 'j', long)]
    pub json: bool,

    #[command(flatten)]
    pub oracle: OracleArgs,
}

/// Arguments for `campaign-forge interactive`.
#[derive(Parser, Debug)]
pub struct InteractiveArgs {
    #[command(flatten)]
    pub oracle: OracleArgs,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse CLI arguments and run.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run with already-parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => run_generate_command(args).await,
        Commands::Interactive(args) => run_interactive_command(args).await,
    }
}

fn load_config(oracle: &OracleArgs) -> anyhow::Result<AppConfig> {
    let config = AppConfig::from_env().context("Failed to load configuration from environment")?;
    oracle.apply(config)
}

fn build_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    if config.api_key.is_none() {
        tracing::warn!(
            api_base = %config.api_base,
            "No API key configured; requests will be sent unauthenticated"
        );
    }
    let client = ChatClient::from_config(config).context("Failed to create LLM client")?;
    info!(
        api_base = %client.api_base(),
        model = %client.default_model(),
        "Using LLM endpoint"
    );
    Ok(Arc::new(client))
}

async fn run_generate_command(args: GenerateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.oracle)?;
    let provider = build_provider(&config)?;
    let mut session = AgentSession::start(provider, SessionOptions::from(&config));

    let request = GenerationRequest::new(args.subject, args.audience, args.objective, args.task);
    session
        .generate(request)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;

    for instruction in &args.refinements {
        session
            .refine(instruction)
            .await
            .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;
    }

    let result = session
        .current()
        .context("Session has no result after generation")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", result.content);
    }

    if let Some(rating) = args.rating {
        let record = session
            .feedback(rating, args.comment.as_deref())
            .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?;
        FeedbackLog::new(&config.feedback_path)
            .record(&record)
            .await
            .context("Failed to record feedback")?;
        eprintln!("{}", record.summary());
    }

    Ok(())
}

async fn run_interactive_command(args: InteractiveArgs) -> anyhow::Result<()> {
    let config = load_config(&args.oracle)?;
    let provider = build_provider(&config)?;
    let session = AgentSession::start(provider, SessionOptions::from(&config));
    let feedback = FeedbackLog::new(&config.feedback_path);

    info!(session_id = %session.id(), "Starting interactive session");

    let input = BufReader::new(tokio::io::stdin());
    let mut shell = InteractiveShell::new(session, feedback, input, std::io::stdout());
    shell.run().await
}
