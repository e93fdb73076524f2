use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gamebook::{CompileOptions, CompileSession};

/// Compile a directory of gamebook sources into a single store.
#[derive(Parser)]
#[command(name = "gbookc", version, about = "Gamebook compiler")]
struct Cli {
    /// Directory searched recursively for source files
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Store file to create (replaces an existing one)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Source file extension
    #[arg(long, value_name = "EXT")]
    extension: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamebook=info,gbookc=info".into()),
        )
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut options = CompileOptions::from_env();
    if let Some(output) = cli.output {
        options = options.with_output(output);
    }
    if let Some(extension) = cli.extension {
        options = options.with_extension(&extension);
    }

    let mut session = CompileSession::create(options.clone())
        .with_context(|| format!("Failed creating store {}", options.output.display()))?;
    let report = session
        .compile_directory(&cli.root)
        .with_context(|| format!("Failed compiling {}", cli.root.display()))?;

    for rejected in &report.rejected {
        println!("==> Skipped {}", rejected.path.display());
        println!("{}", rejected.message);
    }
    println!(
        "==> Wrote {}: {} file(s) compiled, {} rejected, {} warning(s)",
        options.output.display(),
        report.compiled.len(),
        report.rejected.len(),
        report.diagnostics.len()
    );
    Ok(())
}
