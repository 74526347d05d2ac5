mod aggregate;
mod charts;
mod cli;
mod loader;
mod metrics;
mod model;
mod outlier;
mod storage;
mod text_summary;

use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let args = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("loadtest_report=warn"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli::run(args) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}
