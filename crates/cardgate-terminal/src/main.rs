//! cardgate - card access terminal CLI

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardgate_core::{FileAuditLog, FlatFileStore};
use cardgate_terminal::{Authenticator, ConsoleOperator, TerminalConfig};

/// cardgate - card access control terminal
#[derive(Parser)]
#[command(name = "cardgate")]
#[command(about = "Register cards on first use, then authenticate them by expiry and PIN")]
#[command(version)]
struct Cli {
    /// JSON config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card record store
    #[arg(long)]
    store: Option<PathBuf>,

    /// Audit log file
    #[arg(long)]
    audit_log: Option<PathBuf>,

    /// PIN attempts per session
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Exit with 0 when granted, 1 when denied and 2 when incomplete
    #[arg(long)]
    exit_status: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so prompts on stdout stay readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cardgate=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = TerminalConfig::load(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(audit_log) = cli.audit_log {
        config.audit_log_path = audit_log;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.policy.max_attempts = max_attempts;
    }
    config.validate()?;
    debug!(?config, "Resolved configuration");

    let store = FlatFileStore::new(&config.store_path);
    let audit = FileAuditLog::new(&config.audit_log_path);
    let mut authenticator = Authenticator::new(store, audit, config.policy.clone());

    let mut console = ConsoleOperator::stdio();
    let session = authenticator.run(&mut console);
    info!(outcome = ?session.outcome, "Session finished");

    if cli.exit_status {
        Ok(ExitCode::from(session.outcome.exit_code()))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
