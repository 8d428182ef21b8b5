use std::fs::File;
use std::io::{self, BufWriter, Write};

use miette::{bail, Diagnostic, IntoDiagnostic, Result};

use clap::Parser;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use clicker::demo::{self, Demo, DemoError};

mod cli;

use cli::{Args, Mode};

#[derive(Debug, Error, Diagnostic)]
#[error("Oops, some counters went wrong")]
struct AppError {
    #[related]
    errs: Vec<DemoError>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let config = Demo {
        clicks: args.clicks,
        counters: args.counters,
        policy: args.policy.into(),
    };
    info!(?config, mode = ?args.mode, "starting");

    let mut out: Box<dyn Write> = match &args.output_file {
        Some(path) => {
            if path.is_dir() {
                bail!("Output file {:?} is a directory", path);
            }
            if path.exists() {
                warn!("{:?} already exists and will be overridden", path);
            }
            Box::new(BufWriter::new(File::create(path).into_diagnostic()?))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.mode {
        Mode::Closure => demo::closures(&config, &mut out)?,
        Mode::Shared => {
            demo::shared(&config, args.threads, &mut out).map_err(|errs| AppError { errs })?
        }
    }

    out.flush().into_diagnostic()?;

    Ok(())
}
