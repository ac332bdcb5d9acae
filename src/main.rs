use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use blueprint_rs::constants::defaults;
use blueprint_rs::{cli, run};

fn main() {
    let args = cli::Cli::parse();
    init_tracing(args.verbose);

    if let Err(err) = run::run(args) {
        eprintln!("{}", "blueprint-rs: error".red());
        eprintln!("{err}");

        std::process::exit(1);
    }
}

/// Logs go to stderr. RUST_LOG overrides the level picked by `-v`.
fn init_tracing(verbose: bool) {
    let level = match verbose {
        true => defaults::LOG_FILTER_VERBOSE,
        false => defaults::LOG_FILTER,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
