mod cli;
mod render;
mod report;
mod types;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wine_eda_core::StatsError;

use crate::cli::Cli;

/// Initialize tracing on stderr; `--debug` forces TRACE, otherwise
/// `RUST_LOG` applies with WARN as the fallback
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Map the underlying error kind to a process exit code
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StatsError>() {
        Some(StatsError::Load { .. })
        | Some(StatsError::EmptyFile { .. })
        | Some(StatsError::MissingColumn { .. })
        | Some(StatsError::Parse { .. }) => 2,
        Some(StatsError::Domain { .. }) => 3,
        Some(StatsError::SingularMatrix) => 4,
        Some(StatsError::InsufficientData { .. }) => 5,
        Some(StatsError::UndefinedCorrelation { .. }) => 6,
        Some(StatsError::OutOfRange { .. }) => 7,
        _ => 1,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let report = report::build_report(cli)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render(&report, cli.format, &mut out).context("writing report")?;
    out.flush().context("writing report")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}
