use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{InvalidInputCsvError, Result};
use crate::undefined_content::UndefinedContentErrorHandler;

pub const INVALID_ROW_REPORT: &str = "error_invalid_row.csv";
pub const UNDEFINED_CONTENT_REPORT: &str = "error_undefined_content.csv";

/// Collects failed files across a batch and writes the two triage reports.
#[derive(Debug, Default)]
pub struct ErrorTotalizer {
    failures: Vec<InvalidInputCsvError>,
    undefined: UndefinedContentErrorHandler,
}

impl ErrorTotalizer {
    pub fn push(&mut self, failure: InvalidInputCsvError) {
        self.undefined.extend(failure.undefined_content.iter().cloned());
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_files(&self) -> usize {
        self.failures.len()
    }

    pub fn undefined_content(&self) -> &UndefinedContentErrorHandler {
        &self.undefined
    }

    /// Write `error_invalid_row.csv` and, when there is anything to report,
    /// `error_undefined_content.csv`. Returns the invalid row report path.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let invalid_row = dir.join(INVALID_ROW_REPORT);
        let mut wtr = report_writer(&invalid_row)?;
        let mut lines = 0;
        for failure in &self.failures {
            for (index, messages) in &failure.row_errors {
                for message in messages {
                    wtr.write_record([failure.file_name.as_str(), index.to_string().as_str(), message.as_str()])?;
                    lines += 1;
                }
            }
            for message in &failure.file_errors {
                wtr.write_record([failure.file_name.as_str(), "", message.as_str()])?;
                lines += 1;
            }
        }
        wtr.flush()?;
        info!(path = %invalid_row.display(), lines, "wrote invalid row report");

        if !self.undefined.is_empty() {
            let path = dir.join(UNDEFINED_CONTENT_REPORT);
            let mut wtr = report_writer(&path)?;
            for e in self.undefined.iter() {
                wtr.write_record([&e.file_name, &e.store_name, &e.item_name])?;
            }
            wtr.flush()?;
            info!(path = %path.display(), lines = self.undefined.len(), "wrote undefined content report");
        }
        Ok(invalid_row)
    }
}

fn report_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidCellError, InvalidRecordError};
    use crate::undefined_content::UndefinedContentError;

    fn undefined_row(file: &str, store: &str) -> InvalidRecordError {
        let mut e = InvalidRecordError::new(vec![InvalidCellError::Rule(format!(
            "Store name has not been defined in convert table CSV. Store name = {store}"
        ))]);
        e.undefined_content = Some(UndefinedContentError::new(file, store, ""));
        e
    }

    #[test]
    fn test_export_writes_both_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut totalizer = ErrorTotalizer::default();

        let mut mufg = InvalidInputCsvError::new("mufg.csv");
        mufg.record_row(5, undefined_row("mufg.csv", "ｶ)ﾏﾙｲ"));
        mufg.record_row(2, InvalidRecordError::new(vec![InvalidCellError::field("date", "could not parse date: x")]));
        mufg.record_row(7, undefined_row("mufg.csv", "ｶ)ﾏﾙｲ"));
        totalizer.push(mufg);

        let mut view = InvalidInputCsvError::new("view_card.csv");
        view.record_file("Footer has not been found in the last 3 rows. Expected footer = [合計]");
        totalizer.push(view);

        let path = totalizer.export(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(INVALID_ROW_REPORT));
        let invalid_row = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            invalid_row,
            "mufg.csv,2,\"Invalid date, could not parse date: x\"\n\
             mufg.csv,5,Store name has not been defined in convert table CSV. Store name = ｶ)ﾏﾙｲ\n\
             mufg.csv,7,Store name has not been defined in convert table CSV. Store name = ｶ)ﾏﾙｲ\n\
             view_card.csv,,Footer has not been found in the last 3 rows. Expected footer = [合計]\n"
        );
        let undefined = std::fs::read_to_string(dir.path().join(UNDEFINED_CONTENT_REPORT)).unwrap();
        assert_eq!(undefined, "mufg.csv,ｶ)ﾏﾙｲ,\n");
    }

    #[test]
    fn test_undefined_content_report_only_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let mut totalizer = ErrorTotalizer::default();
        let mut failure = InvalidInputCsvError::new("waon.csv");
        failure.record_file("Header has not been found in the first 1 rows. Expected header = [取引日]");
        totalizer.push(failure);
        totalizer.export(dir.path()).unwrap();
        assert!(dir.path().join(INVALID_ROW_REPORT).exists());
        assert!(!dir.path().join(UNDEFINED_CONTENT_REPORT).exists());
    }

    #[test]
    fn test_undefined_content_deduplicated_across_files_in_first_seen_order() {
        let mut totalizer = ErrorTotalizer::default();
        for (file, stores) in [("b.csv", ["ｚ", "ａ"]), ("a.csv", ["ｚ", "ｚ"])] {
            let mut failure = InvalidInputCsvError::new(file);
            for (i, store) in stores.iter().enumerate() {
                failure.record_row(i + 1, undefined_row("amazon.csv", store));
            }
            totalizer.push(failure);
        }
        let stores: Vec<&str> = totalizer
            .undefined_content()
            .iter()
            .map(|e| e.store_name.as_str())
            .collect();
        assert_eq!(stores, ["ｚ", "ａ"]);
        assert_eq!(totalizer.failed_files(), 2);
    }
}
