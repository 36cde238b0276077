//! MoSS command-line front end.
//!
//! Reads graphs stored as JSON records and runs one of the substructure
//! searches on them.

mod args;
mod commands;

use clap::Parser;
use tracing::info;

use args::Args;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    info!("running {:?}", args.command);

    let report = commands::run(&args)?;
    print!("{report}");
    Ok(())
}
