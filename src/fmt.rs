use chrono::NaiveDate;

/// Format an integer amount with thousands separators: 1,234,567
pub fn amount(val: i64) -> String {
    let digits = val.unsigned_abs().to_string();

    let mut with_commas = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if val < 0 {
        format!("-{with_commas}")
    } else {
        with_commas
    }
}

/// Ledger date layout: 2018-11-11
pub fn date(val: NaiveDate) -> String {
    val.format("%Y-%m-%d").to_string()
}
