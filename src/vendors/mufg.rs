//! MUFG Bank account statement (Shift_JIS).
//!
//! ```text
//! "日付","摘要","摘要内容","支払い金額","預かり金額","差引残高","メモ","未資金化区分","入払区分"
//! "2018/11/28","振込１","ﾄｳｷﾖｳﾄﾄﾞｳﾁﾖｳ","","10,000","3,000,000","","","振替入金"
//! ```

use chrono::NaiveDate;
use encoding_rs::{Encoding, SHIFT_JIS};

use crate::cells::{CellReader, Code};
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::{IncomeRow, LedgerRow, PaymentRow, TransferRow};
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

use super::Vendor;

/// Summary written for ATM deposits and withdrawals with the cash card.
const BY_CARD_SUMMARIES: &[&str] = &["カ－ド", "カード"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashFlowKind {
    Income,
    Payment,
    TransferIncome,
    TransferPayment,
}

impl Code for CashFlowKind {
    const ALL: &'static [Self] = &[
        Self::Income,
        Self::Payment,
        Self::TransferIncome,
        Self::TransferPayment,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::Income => "入金",
            Self::Payment => "支払い",
            Self::TransferIncome => "振替入金",
            Self::TransferPayment => "振替支払い",
        }
    }
}

impl CashFlowKind {
    fn is_income(&self) -> bool {
        matches!(self, Self::Income | Self::TransferIncome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MufgRowData {
    pub date: NaiveDate,
    pub summary: String,
    pub summary_content: String,
    pub payed_amount: Option<i64>,
    pub deposit_amount: Option<i64>,
    pub balance: i64,
    pub note: String,
    pub is_uncapitalized: String,
    pub cash_flow_kind: CashFlowKind,
}

impl MufgRowData {
    pub fn is_by_card(&self) -> bool {
        BY_CARD_SUMMARIES.contains(&self.summary.as_str())
    }
}

impl RowData for MufgRowData {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn store_name(&self) -> &str {
        &self.summary_content
    }
}

pub struct Mufg;

impl Vendor for Mufg {
    type Data = MufgRowData;

    const ACCOUNT: AccountType = AccountType::Mufg;
    const FRAMING: Framing = Framing {
        header: &[
            "日付",
            "摘要",
            "摘要内容",
            "支払い金額",
            "預かり金額",
            "差引残高",
            "メモ",
            "未資金化区分",
            "入払区分",
        ],
        header_window: 1,
        footer: None,
        footer_window: 0,
    };

    fn encoding() -> &'static Encoding {
        SHIFT_JIS
    }

    fn parse(cells: &[String]) -> Result<MufgRowData, InvalidRecordError> {
        let mut r = CellReader::new(cells, 9)?;
        let date = r.date(0, "date");
        let summary = r.text(1);
        let summary_content = r.text(2);
        let payed_amount = r.optional_magnitude(3, "payed_amount");
        let deposit_amount = r.optional_magnitude(4, "deposit_amount");
        let balance = r.amount(5, "balance");
        let note = r.text(6);
        let is_uncapitalized = r.text(7);
        let cash_flow_kind = r.code(8, "cash_flow_kind");
        let (Some(date), Some(balance), Some(cash_flow_kind)) = (date, balance, cash_flow_kind) else {
            return Err(r.into_error());
        };
        r.finish()?;
        Ok(MufgRowData {
            date,
            summary,
            summary_content,
            payed_amount,
            deposit_amount,
            balance,
            note,
            is_uncapitalized,
            cash_flow_kind,
        })
    }

    fn check(row: &Row<'_, MufgRowData>, _settings: &Settings) -> Vec<InvalidCellError> {
        let data = row.data();
        if data.cash_flow_kind.is_income() && data.deposit_amount.is_none() {
            return vec![InvalidCellError::Rule(format!(
                "Deposit amount in income row is required. Cash flow kind = {}",
                data.cash_flow_kind.code()
            ))];
        }
        if !data.cash_flow_kind.is_income() && data.payed_amount.is_none() {
            return vec![InvalidCellError::Rule(format!(
                "Payed amount in payment row is required. Cash flow kind = {}",
                data.cash_flow_kind.code()
            ))];
        }
        Vec::new()
    }

    fn convert(row: &Row<'_, MufgRowData>, settings: &Settings) -> LedgerRow {
        let data = row.data();
        let own = &settings.mufg.account_name;
        let cash = &settings.general.cash_account_name;
        let deposit = data.deposit_amount.unwrap_or_default();
        let payed = data.payed_amount.unwrap_or_default();
        let transfer_target = row.store().and_then(|s| s.transfer_target.as_deref());

        match data.cash_flow_kind {
            CashFlowKind::Income if data.is_by_card() => {
                LedgerRow::Transfer(TransferRow::new(data.date, cash, own, deposit))
            }
            CashFlowKind::Income => LedgerRow::Income(IncomeRow::at_store(data.date, row.store(), own, deposit)),
            CashFlowKind::Payment if data.is_by_card() => {
                LedgerRow::Transfer(TransferRow::new(data.date, own, cash, payed))
            }
            CashFlowKind::Payment => LedgerRow::Payment(PaymentRow::at_store(data.date, row.store(), own, payed)),
            CashFlowKind::TransferIncome => match transfer_target {
                Some(target) => LedgerRow::Transfer(TransferRow::new(data.date, target, own, deposit)),
                None => LedgerRow::Income(IncomeRow::at_store(data.date, row.store(), own, deposit)),
            },
            CashFlowKind::TransferPayment => match transfer_target {
                Some(target) => LedgerRow::Transfer(TransferRow::new(data.date, own, target, payed)),
                None => LedgerRow::Payment(PaymentRow::at_store(data.date, row.store(), own, payed)),
            },
        }
    }
}
