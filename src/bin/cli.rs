//! Trend Tracker CLI
//!
//! Local execution entry point, suitable for a cron schedule.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use trend_tracker::{
    config,
    error::Result,
    models::{Config, StoreBackend},
    pipeline::{self, RunOptions, RunOutcome},
    services::{HttpSource, Renderer, SmtpNotifier, TrendExtractor},
    storage,
};

/// Trend Tracker - emails a summary when trending topics change
#[derive(Parser, Debug)]
#[command(
    name = "trend-tracker",
    version,
    about = "Trending topics change notifier"
)]
struct Cli {
    /// Storage directory holding config.toml (also the local snapshot root when given)
    #[arg(short, long)]
    storage_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch trends and send a summary if they changed
    Run {
        /// Send even if the trend set is unchanged
        #[arg(long)]
        force: bool,
    },

    /// Render the summary without sending or saving it
    Preview {
        /// Output file (default: {storage_dir}/preview.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate configuration and credentials
    Validate,

    /// Show stored snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let storage_dir = cli
        .storage_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("storage"));
    let config_path = storage_dir.join("config.toml");

    let (mut config, credentials) = config::load_all(&config_path)?;
    if cli.storage_dir.is_some() && config.store.backend == StoreBackend::Local {
        config.store.root_dir = storage_dir.clone();
    }
    log::info!("Loaded configuration from {}", config_path.display());

    match cli.command {
        Command::Run { force } => {
            // Fail before any network I/O when mail cannot be sent.
            credentials.require()?;

            let source = HttpSource::new(&config.source)?;
            let extractor = TrendExtractor::from_config(&config)?;
            let store = storage::open_store(&config).await?;
            let renderer = Renderer::new(config.render.clone());
            let notifier = SmtpNotifier::new(config.email.clone(), credentials);

            let outcome = pipeline::run_tracker(
                &config,
                &source,
                &extractor,
                store.as_ref(),
                &renderer,
                &notifier,
                RunOptions { force },
            )
            .await;

            match &outcome {
                RunOutcome::Delivered { trend_count } => {
                    log::info!("Notification sent for {} trends", trend_count)
                }
                RunOutcome::Unchanged => log::info!("No changes since last notification"),
                RunOutcome::NoTrends => log::warn!("No trends found; nothing sent"),
                RunOutcome::Failed { stage, .. } => log::error!("Run failed at {} stage", stage),
            }

            return Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }

        Command::Preview { output } => {
            let output = output.unwrap_or_else(|| storage_dir.join("preview.html"));

            let source = HttpSource::new(&config.source)?;
            let extractor = TrendExtractor::from_config(&config)?;
            let renderer = Renderer::new(config.render.clone());

            let preview =
                pipeline::render_preview(&config, &source, &extractor, &renderer).await?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, &preview.html_body)?;

            log::info!("Subject: {}", preview.subject);
            log::info!("Preview written to {}", output.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            validate(&config)?;
            log::info!("✓ Config OK");

            let missing = credentials.missing();
            if !missing.is_empty() {
                log::error!("Missing environment variables: {}", missing.join(", "));
                return Ok(ExitCode::FAILURE);
            }
            log::info!("✓ Email credentials present");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", storage_dir.display());

            let store = storage::open_store(&config).await?;
            match store.read_latest().await? {
                Some(snapshot) => {
                    log::info!("Snapshot: {}", store.location());
                    log::info!("Trends: {}", snapshot.trend_names.len());
                    log::info!("Timestamp: {}", snapshot.timestamp);
                    log::info!("Sent at: {}", snapshot.sent_at.to_rfc3339());
                    log::info!("Fingerprint: {}", snapshot.fingerprint);
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(ExitCode::SUCCESS)
}

/// Checks beyond `Config::validate` that need the parsed selectors.
fn validate(config: &Config) -> Result<()> {
    TrendExtractor::from_config(config)?;
    if !config.render.style_path.exists() {
        log::warn!(
            "Stylesheet {} not found; emails will be unstyled",
            config.render.style_path.display()
        );
    }
    Ok(())
}
