mod batch;
mod cells;
mod cli;
mod convert_table;
mod error;
mod error_report;
mod fmt;
mod framing;
mod importer;
mod ledger;
mod models;
mod row;
mod settings;
mod undefined_content;
mod vendors;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kakeibo=info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            convert_table_dir,
            config,
        } => cli::convert::run(&input_dir, &output_dir, &convert_table_dir, config.as_deref()),
        Commands::Formats => cli::formats::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
