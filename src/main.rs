//! Interp Judge - Command Line Entry Point

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interp_judge::{Config, Judge};

#[derive(Parser)]
#[command(name = "interp-judge")]
#[command(about = "Judge an interpreter's output and memory safety against a test suite")]
#[command(version)]
struct Cli {
    /// Directory holding `<name>.scm` / `<name>.output` pairs [default: tests]
    test_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing; the report owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interp_judge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(test_dir) = cli.test_dir {
        config = config.with_test_dir(test_dir);
    }

    tracing::info!(
        interpreter = %config.execution.interpreter_path.display(),
        test_dir = %config.suite.test_dir.display(),
        "Starting test run"
    );

    // A run that cannot start exits with status 1 via the returned error
    let judge = Judge::new(config);
    let summary = judge
        .run_all(&mut io::stdout().lock())
        .await
        .context("Test run failed")?;

    Ok(ExitCode::from(summary.exit_code()))
}
