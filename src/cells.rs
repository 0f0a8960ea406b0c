use chrono::NaiveDate;

use crate::error::{InvalidCellError, InvalidRecordError};

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a yen amount such as `5,000円`, `￥1,980` or `-3000`.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let s = s.strip_suffix('円').unwrap_or(s).trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let s = s.trim_start_matches(['¥', '￥']);
    let digits: String = s.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let val: i64 = digits.parse().ok()?;
    Some(if negative { -val } else { val })
}

/// Parse `YYYY/M/D`; zero padding is optional.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let y: i32 = parts.next()?.trim().parse().ok()?;
    let m: u32 = parts.next()?.trim().parse().ok()?;
    let d: u32 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A fixed set of codes a vendor writes into one column.
pub trait Code: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn code(&self) -> &'static str;

    fn from_code(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.code() == raw)
    }
}

// ---------------------------------------------------------------------------
// CellReader: tries every field, keeps every failure
// ---------------------------------------------------------------------------

pub struct CellReader<'a> {
    cells: &'a [String],
    errors: Vec<InvalidCellError>,
}

impl<'a> CellReader<'a> {
    pub fn new(cells: &'a [String], expected: usize) -> Result<Self, InvalidRecordError> {
        if cells.len() < expected {
            return Err(InvalidRecordError::new(vec![InvalidCellError::field(
                "row",
                format!("expected {expected} cells but found {}", cells.len()),
            )]));
        }
        Ok(Self {
            cells,
            errors: Vec::new(),
        })
    }

    fn raw(&self, i: usize) -> &'a str {
        self.cells.get(i).map(|c| c.trim()).unwrap_or("")
    }

    pub fn text(&self, i: usize) -> String {
        self.raw(i).to_string()
    }

    pub fn date(&mut self, i: usize, field: &'static str) -> Option<NaiveDate> {
        let raw = self.raw(i);
        let parsed = parse_date(raw);
        if parsed.is_none() {
            self.fail(field, format!("could not parse date: {raw}"));
        }
        parsed
    }

    pub fn optional_date(&mut self, i: usize, field: &'static str) -> Option<NaiveDate> {
        if self.raw(i).is_empty() {
            return None;
        }
        self.date(i, field)
    }

    pub fn amount(&mut self, i: usize, field: &'static str) -> Option<i64> {
        let raw = self.raw(i);
        let parsed = parse_amount(raw);
        if parsed.is_none() {
            self.fail(field, format!("could not parse amount: {raw}"));
        }
        parsed
    }

    /// Amount stored as a magnitude; the sign is dropped.
    pub fn magnitude(&mut self, i: usize, field: &'static str) -> Option<i64> {
        self.amount(i, field).map(i64::abs)
    }

    pub fn optional_magnitude(&mut self, i: usize, field: &'static str) -> Option<i64> {
        if self.raw(i).is_empty() {
            return None;
        }
        self.magnitude(i, field)
    }

    pub fn optional_count(&mut self, i: usize, field: &'static str) -> Option<i64> {
        let raw = self.raw(i);
        if raw.is_empty() {
            return None;
        }
        let parsed = raw.replace(',', "").parse::<i64>().ok().filter(|n| *n >= 0);
        if parsed.is_none() {
            self.fail(field, format!("could not parse count: {raw}"));
        }
        parsed
    }

    /// `marker` means true, an empty cell false.
    pub fn flag(&mut self, i: usize, field: &'static str, marker: &str) -> Option<bool> {
        match self.raw(i) {
            "" => Some(false),
            raw if raw == marker => Some(true),
            raw => {
                self.fail(field, format!("unexpected value: {raw}"));
                None
            }
        }
    }

    pub fn code<T: Code>(&mut self, i: usize, field: &'static str) -> Option<T> {
        let raw = self.raw(i);
        let parsed = T::from_code(raw);
        if parsed.is_none() {
            self.fail(field, format!("unexpected value: {raw}"));
        }
        parsed
    }

    fn fail(&mut self, field: &'static str, reason: String) {
        self.errors.push(InvalidCellError::field(field, reason));
    }

    /// Errors so far, consuming the reader.
    pub fn into_error(self) -> InvalidRecordError {
        InvalidRecordError::new(self.errors)
    }

    /// Fails when any field (required or optional) failed.
    pub fn finish(self) -> Result<(), InvalidRecordError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        Payment,
        Charge,
    }

    impl Code for Kind {
        const ALL: &'static [Self] = &[Self::Payment, Self::Charge];

        fn code(&self) -> &'static str {
            match self {
                Self::Payment => "支払",
                Self::Charge => "チャージ",
            }
        }
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("5,000円"), Some(5000));
        assert_eq!(parse_amount("1,980"), Some(1980));
        assert_eq!(parse_amount("￥1,980"), Some(1980));
        assert_eq!(parse_amount("-3000"), Some(-3000));
        assert_eq!(parse_amount("  129円 "), Some(129));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2018/11/11"), NaiveDate::from_ymd_opt(2018, 11, 11));
        assert_eq!(parse_date("2018/8/7"), NaiveDate::from_ymd_opt(2018, 8, 7));
        assert_eq!(parse_date("2018/02/30"), None);
        assert_eq!(parse_date("2018-11-11"), None);
        assert_eq!(parse_date("2018/11/11/1"), None);
    }

    #[test]
    fn test_reader_accumulates_every_failure() {
        let row = cells(&["2018/13/01", "板橋前野町", "abc", "返品"]);
        let mut r = CellReader::new(&row, 4).unwrap();
        assert!(r.date(0, "date").is_none());
        assert_eq!(r.text(1), "板橋前野町");
        assert!(r.amount(2, "used_amount").is_none());
        assert!(r.code::<Kind>(3, "use_kind").is_none());
        let err = r.finish().unwrap_err();
        let messages: Vec<String> = err.errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid date, could not parse date: 2018/13/01",
                "Invalid used_amount, could not parse amount: abc",
                "Invalid use_kind, unexpected value: 返品",
            ]
        );
    }

    #[test]
    fn test_reader_rejects_short_rows() {
        let row = cells(&["2018/11/11"]);
        let err = CellReader::new(&row, 5).err().unwrap();
        assert_eq!(err.errors[0].to_string(), "Invalid row, expected 5 cells but found 1");
    }

    #[test]
    fn test_optional_cells() {
        let row = cells(&["", "", "x", "定"]);
        let mut r = CellReader::new(&row, 4).unwrap();
        assert_eq!(r.optional_magnitude(0, "price"), None);
        assert_eq!(r.optional_date(1, "billing_date"), None);
        assert_eq!(r.optional_count(2, "number"), None);
        assert_eq!(r.flag(3, "commuter_pass", "定"), Some(true));
        assert_eq!(r.finish().unwrap_err().errors.len(), 1);
    }

    #[test]
    fn test_magnitude_drops_sign() {
        let row = cells(&["-3000"]);
        let mut r = CellReader::new(&row, 1).unwrap();
        assert_eq!(r.magnitude(0, "used_amount"), Some(3000));
        assert!(r.finish().is_ok());
    }
}
