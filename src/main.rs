use clap::Parser;
use console::{Style, Term};
use tracing_subscriber::EnvFilter;

use std::error::Error;

mod args;
use crate::commands::*;
use crate::errors::AppError;
use args::*;

mod reporter;

mod cameras;

mod recognizers;

mod speech;

mod flow;

mod errors;

mod commands;

pub type AppResult<T> = Result<T, AppError>;

mod common_types;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "plate_reader=debug"
    } else {
        "plate_reader=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();
    init_tracing(cli.verbose);

    let term = Term::stdout();
    let bold_style = Style::new().bold();

    term.write_line(
        format!(
            "{} v{}",
            bold_style.clone().green().apply_to("Plate Reader"),
            bold_style.apply_to(env!("CARGO_PKG_VERSION"))
        )
        .as_str(),
    )?;

    if let Err(err) = handle_args(cli, &term).await {
        term.write_line(
            format!(
                "{}: {}\nDetails: {:?}",
                bold_style.clone().red().apply_to("Error"),
                err,
                err.source()
            )
            .as_str(),
        )?;
    }

    Ok(())
}

async fn handle_args(cli: CliArgs, term: &Term) -> AppResult<()> {
    let bold_style = Style::new().bold();

    match cli.command {
        CliCommand::Capture { flow_args } => {
            let capture_result = command_capture(term, flow_args.try_into()?).await?;
            if capture_result.outcome.is_none() {
                term.write_line(
                    format!(
                        "{} camera access was not granted.",
                        Style::new().yellow().apply_to("Nothing captured:")
                    )
                    .as_str(),
                )?;
            }
        }
        CliCommand::Session { flow_args } => {
            let session_result = command_session(term, flow_args.try_into()?).await?;
            term.write_line(
                format!(
                    "Session finished. {} captures.",
                    bold_style.apply_to(session_result.captures)
                )
                .as_str(),
            )?;
        }
    }

    Ok(())
}
