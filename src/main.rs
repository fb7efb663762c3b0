mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod ingest;
mod logging;
mod output;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();
    let config = Config::load();
    let cli = cli.with_config(&config);

    logging::init_logging(cli.debug, cli.quiet);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }
    if let Some(path) = &config.source {
        tracing::debug!("Loaded config from {}", path.display());
    }

    if let Err(e) = app::run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
