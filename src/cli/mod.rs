pub mod convert;
pub mod formats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kakeibo",
    version,
    about = "Convert bank, card and e-money CSV exports into a Zaim import file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every CSV file in a directory.
    Convert {
        /// Directory holding the vendor CSV exports
        input_dir: PathBuf,
        /// Directory the ledger files and error reports are written to
        #[arg(long = "output-dir")]
        output_dir: PathBuf,
        /// Directory holding one convert table CSV per account (e.g. waon.csv)
        #[arg(long = "convert-table-dir")]
        convert_table_dir: PathBuf,
        /// Settings file (default: ~/.config/kakeibo/settings.json)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the supported input formats.
    Formats,
}
