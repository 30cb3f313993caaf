//! `leadgen` - find local business leads and draft outreach emails.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_engine::{
    draft_outreach_email, to_csv, AcquireError, GeminiProvider, Lead, LeadFinder, PlanTier,
};

mod config;

use config::Config;

/// Exit status when a search finds nothing at all.
const EXIT_NO_RESULTS: u8 = 2;

#[derive(Parser)]
#[command(name = "leadgen")]
#[command(about = "Find local business leads with a grounded Gemini model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for businesses matching a term near a location
    Search {
        /// Business type or keyword (e.g., "plumbers")
        #[arg(short, long)]
        term: String,

        /// City, region, or address to search near
        #[arg(short, long)]
        location: String,

        /// Number of leads to collect
        #[arg(short, long, default_value_t = 10)]
        count: usize,

        /// Subscription plan (limits the count)
        #[arg(long, value_enum, default_value_t = Plan::Free)]
        plan: Plan,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write results to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Draft a cold outreach email for one business
    DraftEmail {
        /// Business name
        #[arg(short, long)]
        business: String,

        /// Industry the business operates in
        #[arg(short, long)]
        industry: String,

        /// Where the business is located
        #[arg(short, long)]
        location: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Plan {
    Free,
    Pro,
    Business,
}

impl From<Plan> for PlanTier {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Free => PlanTier::Free,
            Plan::Pro => PlanTier::Pro,
            Plan::Business => PlanTier::Business,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,lead_engine=debug,gemini_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(model = %config.model, "Configuration loaded");

    let mut provider = GeminiProvider::new(&config.api_key);
    if let Some(url) = &config.base_url {
        provider = provider.with_base_url(url);
    }

    match cli.command {
        Commands::Search {
            term,
            location,
            count,
            plan,
            format,
            output,
        } => {
            cmd_search(
                provider,
                &config,
                &term,
                &location,
                count,
                plan.into(),
                format,
                output,
            )
            .await
        }
        Commands::DraftEmail {
            business,
            industry,
            location,
        } => cmd_draft_email(provider, &config, &business, &industry, &location).await,
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_search(
    provider: GeminiProvider,
    config: &Config,
    term: &str,
    location: &str,
    count: usize,
    plan: PlanTier,
    format: Format,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let count = plan.check_count(count)?;
    let finder = LeadFinder::with_config(provider, config.acquire_config());

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling search");
            on_ctrl_c.cancel();
        }
    });

    eprintln!(
        "{}",
        format!("🔎 Searching for {count} \"{term}\" leads near {location}...").bright_cyan()
    );

    let progress = |found: usize| {
        tracing::info!(found, target = count, "Progress");
        eprintln!("  {} {found}/{count}", "found".bright_blue());
    };

    let leads = match finder
        .acquire_with_cancel(term, location, count, Some(&progress), &cancel)
        .await
    {
        Ok(leads) => leads,
        Err(AcquireError::NoData { queries, last_error }) => {
            eprintln!(
                "{}",
                format!("No leads found for \"{term}\" near {location} after {queries} queries.")
                    .bright_yellow()
                    .bold()
            );
            if let Some(e) = last_error {
                eprintln!("  last error: {e}");
            }
            return Ok(ExitCode::from(EXIT_NO_RESULTS));
        }
        Err(e) => return Err(e).context("Search failed"),
    };

    if leads.len() < count {
        eprintln!(
            "{}",
            format!(
                "⚠ Only found {} of {count} requested leads; the area may be exhausted.",
                leads.len()
            )
            .bright_yellow()
        );
    }

    let rendered = render(&leads, format)?;
    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{}",
                format!("✓ Wrote {} leads to {}", leads.len(), path.display()).bright_green()
            );
        }
        None => println!("{rendered}"),
    }

    Ok(ExitCode::SUCCESS)
}

fn render(leads: &[Lead], format: Format) -> Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(leads).context("Failed to serialize leads"),
        Format::Csv => Ok(to_csv(leads)),
    }
}

async fn cmd_draft_email(
    provider: GeminiProvider,
    config: &Config,
    business: &str,
    industry: &str,
    location: &str,
) -> Result<ExitCode> {
    let draft = draft_outreach_email(
        &provider,
        business,
        industry,
        location,
        &config.acquire_config(),
    )
    .await
    .context("Failed to draft email")?;

    println!("{} {}", "Subject:".bold(), draft.subject);
    println!();
    println!("{}", draft.body);

    Ok(ExitCode::SUCCESS)
}
