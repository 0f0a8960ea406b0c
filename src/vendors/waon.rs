//! WAON e-money usage history.
//!
//! ```text
//! 取引日,利用店舗,利用金額（税込）,利用区分,チャージ区分
//! 2018/8/7,ファミリーマート板橋前野町店,129円,支払,-
//! 2018/11/11,板橋前野町,"5,000円",オートチャージ,銀行口座
//! ```

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};

use crate::cells::{CellReader, Code};
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::{IncomeRow, LedgerRow, PaymentRow, TransferRow};
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

use super::Vendor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    Payment,
    Charge,
    AutoCharge,
    DownloadPoint,
}

impl Code for UseKind {
    const ALL: &'static [Self] = &[Self::Payment, Self::Charge, Self::AutoCharge, Self::DownloadPoint];

    fn code(&self) -> &'static str {
        match self {
            Self::Payment => "支払",
            Self::Charge => "チャージ",
            Self::AutoCharge => "オートチャージ",
            Self::DownloadPoint => "ポイントダウンロード",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeKind {
    BankAccount,
    Point,
    Cash,
    Null,
}

impl Code for ChargeKind {
    const ALL: &'static [Self] = &[Self::BankAccount, Self::Point, Self::Cash, Self::Null];

    fn code(&self) -> &'static str {
        match self {
            Self::BankAccount => "銀行口座",
            Self::Point => "ポイント",
            Self::Cash => "現金",
            Self::Null => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaonRowData {
    pub date: NaiveDate,
    pub used_store: String,
    pub used_amount: i64,
    pub use_kind: UseKind,
    pub charge_kind: ChargeKind,
}

impl RowData for WaonRowData {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn store_name(&self) -> &str {
        &self.used_store
    }
}

pub struct Waon;

impl Vendor for Waon {
    type Data = WaonRowData;

    const ACCOUNT: AccountType = AccountType::Waon;
    const FRAMING: Framing = Framing {
        header: &[
            "取引日",
            "利用店舗",
            "利用金額（税込）",
            "利用区分",
            "チャージ区分",
        ],
        header_window: 1,
        footer: None,
        footer_window: 0,
    };

    fn encoding() -> &'static Encoding {
        UTF_8
    }

    fn parse(cells: &[String]) -> Result<WaonRowData, InvalidRecordError> {
        let mut r = CellReader::new(cells, 5)?;
        let date = r.date(0, "date");
        let used_store = r.text(1);
        let used_amount = r.magnitude(2, "used_amount");
        let use_kind = r.code(3, "use_kind");
        let charge_kind = r.code(4, "charge_kind");
        let (Some(date), Some(used_amount), Some(use_kind), Some(charge_kind)) =
            (date, used_amount, use_kind, charge_kind)
        else {
            return Err(r.into_error());
        };
        Ok(WaonRowData {
            date,
            used_store,
            used_amount,
            use_kind,
            charge_kind,
        })
    }

    fn is_row_to_skip(row: &Row<'_, WaonRowData>, _settings: &Settings) -> bool {
        row.data().use_kind == UseKind::DownloadPoint
    }

    fn check(row: &Row<'_, WaonRowData>, _settings: &Settings) -> Vec<InvalidCellError> {
        let data = row.data();
        match (data.use_kind, data.charge_kind) {
            (UseKind::Charge | UseKind::AutoCharge, ChargeKind::Null) => vec![InvalidCellError::Rule(format!(
                "Charge kind in charge row is required. Charge kind = {}",
                data.charge_kind.code()
            ))],
            (UseKind::AutoCharge, kind) if kind != ChargeKind::BankAccount => {
                vec![InvalidCellError::Rule(format!(
                    "Charge kind in auto charge row must be bank account. Charge kind = {}",
                    kind.code()
                ))]
            }
            _ => Vec::new(),
        }
    }

    fn convert(row: &Row<'_, WaonRowData>, settings: &Settings) -> LedgerRow {
        let data = row.data();
        let account = &settings.waon.account_name;
        match (data.use_kind, data.charge_kind) {
            (UseKind::Payment, _) => {
                LedgerRow::Payment(PaymentRow::at_store(data.date, row.store(), account, data.used_amount))
            }
            (UseKind::Charge, ChargeKind::Point) => {
                LedgerRow::Income(IncomeRow::at_store(data.date, row.store(), account, data.used_amount))
            }
            (UseKind::Charge, ChargeKind::Cash) => LedgerRow::Transfer(TransferRow::new(
                data.date,
                &settings.general.cash_account_name,
                account,
                data.used_amount,
            )),
            _ => LedgerRow::Transfer(TransferRow::new(
                data.date,
                &settings.waon.auto_charge_source,
                account,
                data.used_amount,
            )),
        }
    }
}
