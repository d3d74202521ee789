use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sitepack::{BuildArgs, Command, Config};
use sitepack_core::{
    decode_file, format_folder, load_pack_config, run_build, AppError, FormatOptions,
};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(std::io::stdout)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    match run(config.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app) => eprintln!("Error: {}", app.user_message()),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Build(args) => build(&args),
        Command::Format { dir, ascii, config } => format(dir, ascii, config.as_deref()),
        Command::Decode { input, output } => decode(&input, &output),
    }
}

/// Run the full build pipeline
fn build(args: &BuildArgs) -> anyhow::Result<()> {
    let mut config = load_pack_config(args.config.as_deref())?;
    args.apply(&mut config);

    info!(
        "Building from {} (encodings: {})",
        config.sites_dir.display(),
        config.encodings.describe()
    );
    let summary = run_build(&config)?;

    println!("\nBuild {}\n", summary.version);
    println!("  Indexer records:   {}", summary.records);
    println!("  Conf domains:      {}", summary.domains);
    println!("  Skipped files:     {}", summary.skipped());
    for output in config.outputs() {
        println!("  Wrote:             {}", output.display());
    }
    println!();

    Ok(())
}

/// Format every JSON file in a folder, decoding with the configured encodings
fn format(dir: Option<PathBuf>, ascii: bool, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_pack_config(config)?;
    let dir = dir.unwrap_or(config.sites_dir);
    let options = FormatOptions {
        encodings: config.encodings,
        ascii,
    };
    let report = format_folder(&dir, &options)
        .with_context(|| format!("Failed to format {}", dir.display()))?;

    for skipped in &report.skipped {
        warn!("Left untouched: {}", skipped.path.display());
    }
    info!(
        "Formatting complete: {} formatted, {} skipped",
        report.formatted.len(),
        report.skipped.len()
    );
    Ok(())
}

/// Decode a legacy base64 file
fn decode(input: &Path, output: &Path) -> anyhow::Result<()> {
    let report = decode_file(input, output)?;
    if !report.failures.is_empty() {
        error!(
            "{} lines could not be decoded: {:?}",
            report.failures.len(),
            report.failed_lines()
        );
    }
    Ok(())
}
