//! SortDir CLI - sorted flattening copy
//!
//! `sortdir <SOURCE> <SORT_KEY> <DESTINATION>`

use clap::error::ErrorKind;
use clap::Parser;
use sortdir::config::{CliArgs, CopyConfig, OutputFormat};
use sortdir::core::CopyEngine;
use sortdir::error::{Result, SortDirError};
use sortdir::progress::{Diagnostics, ProgressReporter};
use tracing_subscriber::EnvFilter;

fn main() {
    let program = Diagnostics::program_name_from(std::env::args_os().next().as_deref());
    let diagnostics = Diagnostics::new(program);

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let err = usage_error(&e);
            eprintln!("{}", diagnostics.fatal_line(&err));
            eprintln!("Usage: {} <SOURCE> <SORT_KEY> <DESTINATION> [OPTIONS]", diagnostics.program());
            std::process::exit(1);
        }
    };

    init_logging(args.verbose);

    if let Err(e) = run(&args, &diagnostics) {
        eprintln!("{}", diagnostics.fatal_line(&e));
        std::process::exit(1);
    }
}

fn usage_error(error: &clap::Error) -> SortDirError {
    match error.kind() {
        ErrorKind::MissingRequiredArgument | ErrorKind::UnknownArgument | ErrorKind::TooManyValues => {
            SortDirError::Usage("wrong number of arguments".to_string())
        }
        _ => {
            let rendered = error.to_string();
            let first_line = rendered.lines().next().unwrap_or_default();
            SortDirError::Usage(first_line.trim_start_matches("error: ").to_string())
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "error",
            1 => "sortdir=info",
            2 => "sortdir=debug",
            _ => "sortdir=trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &CliArgs, diagnostics: &Diagnostics) -> Result<()> {
    let config = CopyConfig::from_cli(args)?;
    let summary = config.summary;
    let show_progress = config.progress;

    let mut engine = CopyEngine::new(config, diagnostics);
    if show_progress {
        engine = engine.with_progress(ProgressReporter::new());
    }
    let result = engine.execute()?;

    match summary {
        Some(OutputFormat::Text) => result.print_summary(),
        Some(OutputFormat::Json) => println!("{}", result.to_json()?),
        None => {}
    }

    // Per-file problems were already reported and do not change the exit code
    Ok(())
}
