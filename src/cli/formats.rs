use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::models::AccountType;

pub fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Name", "File Name", "Encoding", "Convert Table"]);
    for account in AccountType::ALL {
        table.add_row(vec![
            Cell::new(account.key()),
            Cell::new(account.name()),
            Cell::new(account.file_name_pattern()),
            Cell::new(account.encoding().name()),
            Cell::new(format!("{}.csv ({})", account.key(), account.table_kind().label())),
        ]);
    }
    println!("Supported formats\n{table}");
    Ok(())
}
