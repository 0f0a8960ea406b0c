use std::path::Path;

use tracing::{debug, info, warn};

use crate::convert_table::ConvertTable;
use crate::error::{ConvertError, InvalidInputCsvError, Result};
use crate::framing::FirstForm;
use crate::ledger::{LedgerRow, LedgerWriter};
use crate::models::AccountType;
use crate::row::Row;
use crate::settings::Settings;
use crate::vendors::{classify, Amazon, Classified, Mufg, SfCardViewer, Vendor, ViewCard, Waon};

/// One input file and everything needed to convert it.
pub struct FileJob<'a> {
    pub input: &'a Path,
    pub output_dir: &'a Path,
    pub table: &'a ConvertTable,
    pub settings: &'a Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file_name: String,
    pub account: AccountType,
    pub converted: usize,
    pub skipped: usize,
    pub totals: Totals,
}

/// Amount sums per ledger method for one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: i64,
    pub payment: i64,
    pub transfer: i64,
}

impl Totals {
    fn add(&mut self, row: &LedgerRow) {
        match row {
            LedgerRow::Income(r) => self.income += r.amount,
            LedgerRow::Payment(r) => self.payment += r.amount,
            LedgerRow::Transfer(r) => self.transfer += r.amount,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string()
}

/// Convert one vendor file into a ledger file of the same name.
///
/// Row and framing problems are collected into one
/// [`ConvertError::InvalidInputCsv`], returned after the output has been
/// written and closed. Anything else (IO, CSV syntax) aborts immediately.
pub fn convert_file(job: &FileJob) -> Result<FileSummary> {
    let name = file_name(job.input);
    let Some(account) = AccountType::detect(&name)? else {
        let mut failure = InvalidInputCsvError::new(&name);
        failure.record_file(format!(
            "Input CSV file name does not match any supported format. File name = {name}"
        ));
        warn!(file = %name, "no vendor format matches file name");
        return Err(ConvertError::InvalidInputCsv(Box::new(failure)));
    };
    info!(file = %name, account = account.key(), "converting");
    match account {
        AccountType::Waon => convert_rows::<Waon>(job, &name),
        AccountType::Mufg => convert_rows::<Mufg>(job, &name),
        AccountType::SfCardViewer => convert_rows::<SfCardViewer>(job, &name),
        AccountType::Amazon => convert_rows::<Amazon>(job, &name),
        AccountType::ViewCard => convert_rows::<ViewCard>(job, &name),
    }
}

fn convert_rows<V: Vendor>(job: &FileJob, name: &str) -> Result<FileSummary> {
    let form = FirstForm::read(job.input, &V::FRAMING, V::encoding())?;
    let mut writer = LedgerWriter::create(&job.output_dir.join(name))?;
    let mut failure = InvalidInputCsvError::new(name);
    let mut skipped = 0;
    let mut totals = Totals::default();

    for (index, cells) in form.rows() {
        let data = match V::parse(cells) {
            Ok(data) => data,
            Err(e) => {
                warn!(file = name, index, "{e}");
                failure.record_row(index, e);
                continue;
            }
        };
        match classify::<V>(Row::new(data, V::ACCOUNT, name, job.table), job.settings) {
            Classified::Skip => {
                debug!(file = name, index, "skipped");
                skipped += 1;
            }
            Classified::Invalid(e) => {
                warn!(file = name, index, "{e}");
                failure.record_row(index, e);
            }
            Classified::Valid(row) => {
                let ledger = V::convert(&row, job.settings);
                debug!(file = name, index, date = %row.date(), method = ledger.method(), "converted");
                writer.write(&ledger)?;
                totals.add(&ledger);
            }
        }
    }
    for e in form.errors() {
        warn!(file = name, "{e}");
        failure.record_file(e.to_string());
    }

    let converted = writer.finish()?;
    if !failure.is_empty() {
        return Err(ConvertError::InvalidInputCsv(Box::new(failure)));
    }
    info!(file = name, converted, skipped, "converted");
    Ok(FileSummary {
        file_name: name.to_string(),
        account: V::ACCOUNT,
        converted,
        skipped,
        totals,
    })
}
