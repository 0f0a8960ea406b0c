use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::convert_table::{Item, Store};
use crate::error::Result;
use crate::fmt;

/// Zaim import layout.
pub const HEADER: [&str; 16] = [
    "日付",
    "方法",
    "カテゴリ",
    "カテゴリの内訳",
    "支払元",
    "入金先",
    "品目",
    "メモ",
    "お店",
    "通貨",
    "収入",
    "支出",
    "振替",
    "残高調整",
    "通貨変換前の金額",
    "集計の設定",
];

/// Written into every text column that has no value.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRow {
    pub date: NaiveDate,
    pub category: Option<String>,
    pub cash_flow_target: String,
    pub store_name: Option<String>,
    pub amount: i64,
}

impl IncomeRow {
    pub fn at_store(date: NaiveDate, store: Option<&Store>, cash_flow_target: &str, amount: i64) -> Self {
        Self {
            date,
            category: store.and_then(|s| s.category_income.clone()),
            cash_flow_target: cash_flow_target.to_string(),
            store_name: store.map(|s| s.display_name.clone()),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRow {
    pub date: NaiveDate,
    pub category_large: Option<String>,
    pub category_small: Option<String>,
    pub cash_flow_source: String,
    pub item_name: Option<String>,
    pub note: Option<String>,
    pub store_name: Option<String>,
    /// Negative for discounts and refunds.
    pub amount: i64,
}

impl PaymentRow {
    pub fn at_store(date: NaiveDate, store: Option<&Store>, cash_flow_source: &str, amount: i64) -> Self {
        Self {
            date,
            category_large: store.and_then(|s| s.category_payment_large.clone()),
            category_small: store.and_then(|s| s.category_payment_small.clone()),
            cash_flow_source: cash_flow_source.to_string(),
            item_name: None,
            note: None,
            store_name: store.map(|s| s.display_name.clone()),
            amount,
        }
    }

    pub fn of_item(
        date: NaiveDate,
        item: Option<&Item>,
        store_name: &str,
        cash_flow_source: &str,
        amount: i64,
    ) -> Self {
        Self {
            date,
            category_large: item.and_then(|i| i.category_payment_large.clone()),
            category_small: item.and_then(|i| i.category_payment_small.clone()),
            cash_flow_source: cash_flow_source.to_string(),
            item_name: item.map(|i| i.display_name.clone()),
            note: None,
            store_name: Some(store_name.to_string()),
            amount,
        }
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRow {
    pub date: NaiveDate,
    pub cash_flow_source: String,
    pub cash_flow_target: String,
    pub amount: i64,
}

impl TransferRow {
    pub fn new(date: NaiveDate, cash_flow_source: &str, cash_flow_target: &str, amount: i64) -> Self {
        Self {
            date,
            cash_flow_source: cash_flow_source.to_string(),
            cash_flow_target: cash_flow_target.to_string(),
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerRow {
    Income(IncomeRow),
    Payment(PaymentRow),
    Transfer(TransferRow),
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| PLACEHOLDER.to_string())
}

impl LedgerRow {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Income(_) => "income",
            Self::Payment(_) => "payment",
            Self::Transfer(_) => "transfer",
        }
    }

    pub fn to_record(&self) -> [String; 16] {
        let dash = || PLACEHOLDER.to_string();
        let (date, category, breakdown, source, target, item, note, store, income, payment, transfer) =
            match self {
                Self::Income(r) => (
                    r.date,
                    text(&r.category),
                    dash(),
                    dash(),
                    r.cash_flow_target.clone(),
                    dash(),
                    dash(),
                    text(&r.store_name),
                    r.amount,
                    0,
                    0,
                ),
                Self::Payment(r) => (
                    r.date,
                    text(&r.category_large),
                    text(&r.category_small),
                    r.cash_flow_source.clone(),
                    dash(),
                    text(&r.item_name),
                    text(&r.note),
                    text(&r.store_name),
                    0,
                    r.amount,
                    0,
                ),
                Self::Transfer(r) => (
                    r.date,
                    dash(),
                    dash(),
                    r.cash_flow_source.clone(),
                    r.cash_flow_target.clone(),
                    dash(),
                    dash(),
                    dash(),
                    0,
                    0,
                    r.amount,
                ),
            };
        [
            fmt::date(date),
            self.method().to_string(),
            category,
            breakdown,
            source,
            target,
            item,
            note,
            store,
            dash(),
            income.to_string(),
            payment.to_string(),
            transfer.to_string(),
            dash(),
            dash(),
            dash(),
        ]
    }
}

/// Output sink for one converted file. The header is written on creation;
/// `csv::Writer` flushes on drop, so rows written before an error survive.
pub struct LedgerWriter {
    writer: csv::Writer<File>,
    written: usize,
}

impl LedgerWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_path(path)?;
        writer.write_record(HEADER)?;
        Ok(Self { writer, written: 0 })
    }

    pub fn write(&mut self, row: &LedgerRow) -> Result<()> {
        self.writer.write_record(row.to_record())?;
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        Ok(self.written)
    }
}
