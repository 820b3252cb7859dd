//! flowtag - flow log tagging report
//!
//! Entry point for the flowtag command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use flowtag::{pipeline, Config, DEFAULT_CONFIG_FILE};

/// Tag flow log records by destination port and protocol
#[derive(Parser, Debug)]
#[command(name = "flowtag")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file naming lookup_file, flow_log_file and output_file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print the report to stdout instead of writing output_file
    #[arg(long)]
    print: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing on stderr so stdout carries only the report
fn init_logging(level: &str) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_new(level).context("Invalid log level")?)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;

    if args.print {
        pipeline::run_to_console(&config)?;
    } else {
        pipeline::run_to_file(&config)?;
        println!("Output written to {}", config.output_file.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("flowtag: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!(config = %args.config.display(), print = args.print, "Starting flowtag");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<flowtag::FlowTagError>() {
                Some(err) => error!(stage = err.stage(), "An error occurred: {}", err),
                None => error!("An error occurred: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
