use std::path::Path;

use encoding_rs::Encoding;

use crate::error::{FramingError, Result};

/// Where a vendor's data region sits inside its file.
#[derive(Debug, Clone, Copy)]
pub struct Framing {
    /// Expected leading cells of the header record.
    pub header: &'static [&'static str],
    /// Number of leading records searched for the header.
    pub header_window: usize,
    pub footer: Option<&'static [&'static str]>,
    /// Number of trailing records searched for the footer.
    pub footer_window: usize,
}

fn row_matches(expected: &[&str], record: &[String]) -> bool {
    record.len() >= expected.len()
        && expected
            .iter()
            .zip(record)
            .all(|(expected, cell)| cell.trim() == *expected)
}

fn is_blank(record: &[String]) -> bool {
    record.iter().all(|c| c.trim().is_empty())
}

/// A vendor file with header and footer stripped.
pub struct FirstForm {
    records: Vec<Vec<String>>,
    data_start: usize,
    data_end: usize,
    errors: Vec<FramingError>,
}

impl FirstForm {
    pub fn read(path: &Path, framing: &Framing, encoding: &'static Encoding) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let (text, actual, had_errors) = encoding.decode(&bytes);
        let mut form = Self::parse(&text, framing)?;
        if had_errors {
            form.errors.insert(0, FramingError::Encoding { encoding: actual.name() });
        }
        Ok(form)
    }

    pub fn parse(text: &str, framing: &Framing) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let header = records
            .iter()
            .take(framing.header_window)
            .position(|r| row_matches(framing.header, r));
        let Some(header) = header else {
            return Ok(Self {
                records,
                data_start: 0,
                data_end: 0,
                errors: vec![FramingError::Header {
                    window: framing.header_window,
                    expected: framing.header.join(", "),
                }],
            });
        };
        let data_start = header + 1;

        let (data_end, error) = match framing.footer {
            None => (records.len(), None),
            Some(footer) => {
                let found = (data_start..records.len())
                    .rev()
                    .take(framing.footer_window)
                    .find(|&i| row_matches(footer, &records[i]));
                match found {
                    Some(i) => (i, None),
                    None => (
                        records.len(),
                        Some(FramingError::Footer {
                            window: framing.footer_window,
                            expected: footer.join(", "),
                        }),
                    ),
                }
            }
        };

        Ok(Self {
            records,
            data_start,
            data_end,
            errors: error.into_iter().collect(),
        })
    }

    /// Data records with their 0-based record index in the file.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        (self.data_start..self.data_end)
            .map(|i| (i, self.records[i].as_slice()))
            .filter(|(_, record)| !is_blank(record))
    }

    /// Decoding, header or footer problems; rows already yielded stay valid.
    pub fn errors(&self) -> &[FramingError] {
        &self.errors
    }
}
