use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use freedoom_feed::config::FeedConfig;
use freedoom_feed::feed::{build_feed, write_to_file};

#[derive(Parser, Debug)]
#[command(
    name = "freedoom-feed",
    version,
    about = "Convert the Freedoom changelog into an RSS feed"
)]
struct Args {
    /// Changelog document to read
    input: PathBuf,

    /// Feed file to write (replaced if it exists)
    output: PathBuf,

    /// TOML file overriding the channel metadata
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => FeedConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => FeedConfig::default(),
    };

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read changelog '{}'", args.input.display()))?;

    // Nothing is written unless the whole changelog parsed.
    let doc = build_feed(&text, &config)
        .with_context(|| format!("Failed to parse changelog '{}'", args.input.display()))?;

    write_to_file(&doc, &args.output)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        items = doc.items.len(),
        "Wrote feed"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
