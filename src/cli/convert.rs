use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::batch::convert_all;
use crate::convert_table::ConvertTable;
use crate::error::Result;
use crate::fmt::amount;
use crate::settings::load_settings;

pub fn run(input_dir: &Path, output_dir: &Path, convert_table_dir: &Path, config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config)?;
    let table = ConvertTable::load_dir(convert_table_dir)?;
    let summary = convert_all(input_dir, output_dir, &table, &settings)?;

    if summary.files.is_empty() {
        println!("No CSV files found in {}", input_dir.display());
        return Ok(());
    }

    let mut out = Table::new();
    out.set_header(vec!["File", "Format", "Rows", "Skipped", "Income", "Payment", "Transfer"]);
    for file in &summary.files {
        out.add_row(vec![
            Cell::new(&file.file_name),
            Cell::new(file.account.key()),
            Cell::new(file.converted).set_alignment(CellAlignment::Right),
            Cell::new(file.skipped).set_alignment(CellAlignment::Right),
            Cell::new(amount(file.totals.income).green()).set_alignment(CellAlignment::Right),
            Cell::new(amount(file.totals.payment).red()).set_alignment(CellAlignment::Right),
            Cell::new(amount(file.totals.transfer)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{out}");
    println!(
        "{} {} rows from {} files ({} skipped) into {}",
        "Converted".green().bold(),
        summary.converted(),
        summary.files.len(),
        summary.skipped(),
        output_dir.display()
    );
    Ok(())
}
