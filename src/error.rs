use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::undefined_content::{UndefinedContentError, UndefinedContentErrorHandler};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Convert table error: {0}")]
    ConvertTable(String),

    #[error("{0}")]
    InvalidInputCsv(Box<InvalidInputCsvError>),

    #[error("Some invalid input CSV file exists. Please check {}", report.display())]
    SomeInvalidInputCsv { report: PathBuf, failed_files: usize },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// One cell (or one cross-field rule) that a row failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCellError {
    #[error("Invalid {field}, {reason}")]
    Field { field: &'static str, reason: String },

    #[error("{0}")]
    Rule(String),
}

impl InvalidCellError {
    pub fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Field {
            field,
            reason: reason.into(),
        }
    }
}

/// A row that cannot be converted. Never aborts the file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid record: {}", messages(.errors))]
pub struct InvalidRecordError {
    pub errors: Vec<InvalidCellError>,
    pub undefined_content: Option<UndefinedContentError>,
}

impl InvalidRecordError {
    pub fn new(errors: Vec<InvalidCellError>) -> Self {
        Self {
            errors,
            undefined_content: None,
        }
    }
}

fn messages(errors: &[InvalidCellError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FramingError {
    #[error("Input CSV file is not valid {encoding}")]
    Encoding { encoding: &'static str },

    #[error("Header has not been found in the first {window} rows. Expected header = [{expected}]")]
    Header { window: usize, expected: String },

    #[error("Footer has not been found in the last {window} rows. Expected footer = [{expected}]")]
    Footer { window: usize, expected: String },
}

/// Everything that went wrong in one input file.
///
/// Row errors are keyed by the 0-based record index in the input file;
/// file errors (framing, unknown format) have no index.
#[derive(Error, Debug, Clone, Default)]
#[error("Invalid input CSV file. File name = {file_name}")]
pub struct InvalidInputCsvError {
    pub file_name: String,
    pub file_errors: Vec<String>,
    pub row_errors: BTreeMap<usize, Vec<String>>,
    pub undefined_content: UndefinedContentErrorHandler,
}

impl InvalidInputCsvError {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            ..Default::default()
        }
    }

    pub fn record_row(&mut self, index: usize, error: InvalidRecordError) {
        let messages = self.row_errors.entry(index).or_default();
        messages.extend(error.errors.iter().map(|e| e.to_string()));
        if let Some(undefined) = error.undefined_content {
            self.undefined_content.push(undefined);
        }
    }

    pub fn record_file(&mut self, message: impl Into<String>) {
        self.file_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.file_errors.is_empty() && self.row_errors.is_empty()
    }
}
