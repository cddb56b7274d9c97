//! fileferry - batch file transfer runner
//!
//! Executes configured copy and move tasks with bounded concurrency and
//! automatic retry, writes log artifacts, and sends a run notification when
//! the configured trigger fires.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use fileferry_config::{Config, ConfigError, ConfigLoader, EnvSecretResolver};
use fileferry_engine::Pipeline;
use fileferry_sinks::{JsonArtifactWriter, JsonlEventLog, SmtpNotifier};
use fileferry_types::{
    ArtifactWriter, NotificationTransport, RunReport, SystemLogSink,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// fileferry - batch file transfer runner
#[derive(Parser)]
#[command(
    name = "fileferry",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch file transfer runner",
    long_about = "fileferry executes a batch of configured copy or move tasks with\n\
                  bounded concurrency and automatic retry on transient failures,\n\
                  persists run logs according to declarative policy, and sends a\n\
                  summary notification when the configured trigger fires."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,

    /// Verbose mode - detailed output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the configured transfer tasks
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file and report every issue
    Validate {
        /// Configuration file path
        config: PathBuf,
    },
    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.quiet, cli.verbose)?;

    info!("fileferry v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run { config } => run_command(config, cli.quiet).await,
        Commands::Validate { config } => validate_command(config),
        Commands::Config { default } => config_command(default),
    }
}

fn init_logging(debug: bool, quiet: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap();

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

async fn run_command(config_path: Option<PathBuf>, quiet: bool) -> Result<ExitCode> {
    let config = match &config_path {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load_default()?,
    };

    if !quiet {
        println!(
            "{} Running {} transfer task(s)",
            style("→").green().bold(),
            style(config.tasks.len()).cyan()
        );
    }

    let pb = if quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.set_message("Transferring files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    };

    let pipeline = build_pipeline(config)?;
    let report = pipeline.run().await;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if !quiet {
        print_summary(&report);
    }

    // Any system error makes the run a failure for the caller
    if report.is_failure() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn build_pipeline(config: Config) -> Result<Pipeline> {
    let artifact_writer: Arc<dyn ArtifactWriter> = Arc::new(JsonArtifactWriter::new(
        config.logging.directory.clone(),
        config.logging.formats.clone(),
    ));

    let event_log_path = config
        .event_log
        .path
        .clone()
        .unwrap_or_else(|| config.logging.directory.join("events.jsonl"));
    let event_log: Arc<dyn SystemLogSink> = Arc::new(JsonlEventLog::new(
        event_log_path,
        config.event_log.source.clone(),
        config.event_log.log_name.clone(),
    ));

    let mut builder = Pipeline::builder(config.clone())
        .with_artifact_writer(artifact_writer)
        .with_event_log(event_log);

    if let Some(smtp) = &config.notification.smtp {
        let notifier: Arc<dyn NotificationTransport> =
            Arc::new(SmtpNotifier::from_config(smtp, &EnvSecretResolver::new())?);
        builder = builder.with_notifier(notifier);
    }

    Ok(builder.build())
}

fn print_summary(report: &RunReport) {
    let summary = report.summary();

    println!(
        "{} {} file action(s) in {:.1}s",
        style("✓").green().bold(),
        summary.total_actions,
        report.duration.as_secs_f64()
    );

    if summary.action_errors > 0 {
        println!(
            "{} {} action error(s)",
            style("✗").red().bold(),
            summary.action_errors
        );
        for outcome in report.failed_outcomes() {
            println!(
                "    {} '{}': {}",
                outcome.action,
                outcome.source.display(),
                style(outcome.error.as_deref().unwrap_or("unknown error")).red()
            );
        }
    }

    if summary.system_errors > 0 {
        println!(
            "{} {} system error(s)",
            style("✗").red().bold(),
            summary.system_errors
        );
        for error in &report.system_errors {
            println!("    {}", style(&error.message).red());
        }
    }
}

fn validate_command(config_path: PathBuf) -> Result<ExitCode> {
    match ConfigLoader::load_from_file(&config_path) {
        Ok(config) => {
            println!(
                "{} '{}' is valid ({} task(s))",
                style("✓").green().bold(),
                config_path.display(),
                config.tasks.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(ConfigError::Validation { issues }) => {
            println!(
                "{} '{}' has {} issue(s):",
                style("✗").red().bold(),
                config_path.display(),
                issues.len()
            );
            for issue in issues {
                println!("    {}", style(issue).red());
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn config_command(default: bool) -> Result<ExitCode> {
    let config = if default {
        Config::default()
    } else {
        ConfigLoader::load_default()?
    };

    println!("{}", serde_yaml::to_string(&config)?);
    Ok(ExitCode::SUCCESS)
}
