use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::convert_table::ConvertTable;
use crate::error::{ConvertError, Result};
use crate::error_report::ErrorTotalizer;
use crate::importer::{convert_file, FileJob, FileSummary};
use crate::settings::Settings;

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub files: Vec<FileSummary>,
}

impl BatchSummary {
    pub fn converted(&self) -> usize {
        self.files.iter().map(|f| f.converted).sum()
    }

    pub fn skipped(&self) -> usize {
        self.files.iter().map(|f| f.skipped).sum()
    }
}

/// `*.csv` files directly under `dir`, sorted by file name.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Convert every input file, then report all invalid files at once.
///
/// A file that fails validation never stops the batch. When any did, the two
/// error reports are written to `output_dir` and
/// [`ConvertError::SomeInvalidInputCsv`] is returned.
pub fn convert_all(
    input_dir: &Path,
    output_dir: &Path,
    table: &ConvertTable,
    settings: &Settings,
) -> Result<BatchSummary> {
    if input_dir.canonicalize()? == output_dir.canonicalize().unwrap_or_else(|_| output_dir.to_path_buf()) {
        return Err(ConvertError::Other(
            "Output directory must differ from the input directory".to_string(),
        ));
    }
    std::fs::create_dir_all(output_dir)?;

    let inputs = list_input_files(input_dir)?;
    info!(input = %input_dir.display(), files = inputs.len(), "starting batch");

    let mut summary = BatchSummary::default();
    let mut totalizer = ErrorTotalizer::default();
    for input in &inputs {
        let job = FileJob {
            input,
            output_dir,
            table,
            settings,
        };
        match convert_file(&job) {
            Ok(file) => summary.files.push(file),
            Err(ConvertError::InvalidInputCsv(failure)) => totalizer.push(*failure),
            Err(e) => return Err(e),
        }
    }

    if totalizer.is_empty() {
        info!(files = summary.files.len(), converted = summary.converted(), "batch finished");
        return Ok(summary);
    }
    let report = totalizer.export(output_dir)?;
    warn!(
        failed = totalizer.failed_files(),
        undefined = totalizer.undefined_content().len(),
        "batch finished with invalid files"
    );
    Err(ConvertError::SomeInvalidInputCsv {
        report,
        failed_files: totalizer.failed_files(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert_table::tests::store;
    use crate::error_report::{INVALID_ROW_REPORT, UNDEFINED_CONTENT_REPORT};
    use crate::models::AccountType;

    const WAON_HEADER: &str = "取引日,利用店舗,利用金額（税込）,利用区分,チャージ区分\n";

    fn table() -> ConvertTable {
        let mut table = ConvertTable::default();
        table
            .add_store(AccountType::Waon, store("板橋前野町", "イオンスタイル板橋前野町"))
            .unwrap();
        table
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn read(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).unwrap()
    }

    #[test]
    fn test_list_input_files_sorted_csv_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["waon_b.csv", "notes.txt", "amazon.CSV", "mufg.csv"] {
            write(dir.path(), name, "");
        }
        std::fs::create_dir(dir.path().join("sub.csv")).unwrap();
        let names: Vec<String> = list_input_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["amazon.CSV", "mufg.csv", "waon_b.csv"]);
    }

    #[test]
    fn test_all_valid() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "waon.csv", &format!("{WAON_HEADER}2018/8/7,板橋前野町,129円,支払,-\n"));
        let summary = convert_all(input.path(), output.path(), &table(), &Settings::default()).unwrap();
        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.converted(), 1);
        assert!(!output.path().join(INVALID_ROW_REPORT).exists());
    }

    #[test]
    fn test_framing_failure_does_not_stop_other_files() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "waon_a.csv", "not,a,header\n");
        write(input.path(), "waon_b.csv", &format!("{WAON_HEADER}2018/8/7,板橋前野町,129円,支払,-\n"));

        let err = convert_all(input.path(), output.path(), &table(), &Settings::default()).unwrap_err();
        let ConvertError::SomeInvalidInputCsv { report, failed_files } = err else {
            panic!("expected batch failure")
        };
        assert_eq!(failed_files, 1);
        assert_eq!(report, output.path().join(INVALID_ROW_REPORT));
        assert_eq!(read(output.path(), "waon_b.csv").lines().count(), 2);
        let invalid_row = read(output.path(), INVALID_ROW_REPORT);
        assert!(invalid_row.starts_with("waon_a.csv,,\"Header has not been found in the first 1 rows."));
        assert!(!output.path().join(UNDEFINED_CONTENT_REPORT).exists());
    }

    #[test]
    fn test_undefined_content_deduplicated_across_rows() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let rows = "2018/8/7,未登録,129円,支払,-\n2018/8/8,未登録,200円,支払,-\n";
        write(input.path(), "waon.csv", &format!("{WAON_HEADER}{rows}"));

        assert!(convert_all(input.path(), output.path(), &table(), &Settings::default()).is_err());
        assert_eq!(read(output.path(), UNDEFINED_CONTENT_REPORT), "waon.csv,未登録,\n");
        assert_eq!(read(output.path(), INVALID_ROW_REPORT).lines().count(), 2);
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let rows = "2018/8/7,板橋前野町,129円,支払,-\n2018/8/8,未登録,200円,支払,-\n";
        write(input.path(), "waon.csv", &format!("{WAON_HEADER}{rows}"));

        let snapshot = || {
            ["waon.csv", INVALID_ROW_REPORT, UNDEFINED_CONTENT_REPORT].map(|n| read(output.path(), n))
        };
        let _ = convert_all(input.path(), output.path(), &table(), &Settings::default());
        let first = snapshot();
        let _ = convert_all(input.path(), output.path(), &table(), &Settings::default());
        assert_eq!(first, snapshot());
    }

    #[test]
    fn test_same_input_and_output_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_all(dir.path(), dir.path(), &table(), &Settings::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Other(_)));
    }
}
