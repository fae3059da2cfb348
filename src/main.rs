//! Chronos - Application Entry Point
//!
//! Parses flags, installs signal handlers and runs the harness loop.

use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chronos::{
    cli::Cli,
    config::HarnessConfig,
    utils::time::format_std_duration,
    HarnessError, HarnessRunner,
};

#[tokio::main]
async fn main() {
    // Allow CHRONOS_* settings to live in a .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                if cli.verbose {
                    "chronos=debug".into()
                } else {
                    "chronos=info".into()
                }
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match HarnessConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => exit_with(e.into()),
    };

    tracing::info!(
        "Benchmarking {} on {} (timeout {:?}, log {})",
        config.exec.display(),
        config.testcases_dir.display(),
        config.timeout,
        config.log_path.display()
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown signal received, stopping current testcase...");
        let _ = shutdown_tx.send(true);
    });

    let runner = HarnessRunner::new(config);
    match runner.run(shutdown_rx).await {
        Ok(summary) => {
            tracing::info!(
                "Wrote {} records to {} in {}",
                summary.total,
                summary.log_path.display(),
                format_std_duration(summary.elapsed)
            );
        }
        Err(e @ HarnessError::Interrupted) => {
            tracing::warn!("Interrupted; partial results are in {}", runner.config().log_path.display());
            std::process::exit(e.exit_code());
        }
        Err(e) => exit_with(e),
    }
}

/// Report a fatal error once and exit with its code
fn exit_with(e: HarnessError) -> ! {
    let code = e.exit_code();
    let stage = if e.is_setup_error() {
        "Setup failed"
    } else {
        "Run aborted"
    };
    let tag = e.error_code();
    let report = anyhow::Error::new(e).context(stage);
    tracing::error!("{:#} ({})", report, tag);
    std::process::exit(code);
}

/// Resolve on Ctrl+C or SIGTERM
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
