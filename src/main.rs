use std::{
    fs,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use lunac::{
    config::{BuildConfig, DEFAULT_CONFIG_FILE},
    diagnostics::Diagnostic,
    pipeline::{compile, render_failure},
};

#[derive(Parser, Debug)]
#[command(name = "lunac")]
#[command(about = "Compile a multi-module Lua project into a single war3map.lua")]
struct Args {
    /// Entry file, relative to the source directory
    entry: Option<PathBuf>,

    /// Directory the modules are resolved against
    src_dir: Option<PathBuf>,

    /// Directory that receives the linked script
    dst_dir: Option<PathBuf>,

    /// JSON build configuration (defaults to ./lunac.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON build report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log every stage and module
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "lunac=debug" } else { "lunac=info" })
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<BuildConfig, Box<Diagnostic>> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            BuildConfig::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => BuildConfig::default(),
    };

    if let Some(entry) = &args.entry {
        config.entry = entry.clone();
    }
    if let Some(src_dir) = &args.src_dir {
        config.src_dir = src_dir.clone();
    }
    if let Some(dst_dir) = &args.dst_dir {
        config.dst_dir = dst_dir.clone();
    }
    Ok(config)
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(diag) => {
            eprint!("{}", render_failure(&BuildConfig::default(), &[*diag]));
            process::exit(1);
        }
    };

    let report = match compile(&config) {
        Ok(report) => report,
        Err(diagnostics) => {
            eprint!("{}", render_failure(&config, &diagnostics));
            process::exit(1);
        }
    };

    if let Some(path) = &args.report {
        let written = serde_json::to_string_pretty(&report)
            .map_err(|err| err.to_string())
            .and_then(|json| fs::write(path, json).map_err(|err| err.to_string()));
        if let Err(err) = written {
            error!("Failed to write report {}: {}", path.display(), err);
            process::exit(1);
        }
    }

    info!(
        "Wrote {} ({} bytes, sha256 {})",
        report.output.display(),
        report.bytes,
        report.sha256
    );
}
