//! SF Card Viewer export of a PASMO/Suica usage history (Shift_JIS).
//!
//! ```text
//! 利用年月日,定期,鉄道会社名,入場駅/事業者名,定期,鉄道会社名,出場駅/降車場所,利用額,残額,メモ
//! 2018/11/13,,ＪＲ東,五反田,,ＪＲ東,秋葉原,-195,3601,
//! 2018/11/14,,,ﾍﾞﾙﾏｰﾄ,,,,-420,3181,物販
//! ```

use chrono::NaiveDate;
use encoding_rs::{Encoding, SHIFT_JIS};

use crate::cells::{CellReader, Code};
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::{LedgerRow, PaymentRow, TransferRow};
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

use super::Vendor;

/// Written in the commuter pass columns when the section is covered by a pass.
const COMMUTER_PASS: &str = "定";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Train,
    ExitByWindow,
    SalesGoods,
    Bus,
    AutoCharge,
}

impl Code for Note {
    const ALL: &'static [Self] = &[
        Self::Train,
        Self::ExitByWindow,
        Self::SalesGoods,
        Self::Bus,
        Self::AutoCharge,
    ];

    fn code(&self) -> &'static str {
        match self {
            Self::Train => "",
            Self::ExitByWindow => "窓出",
            Self::SalesGoods => "物販",
            Self::Bus => "ﾊﾞｽ/路面等",
            Self::AutoCharge => "ｵｰﾄﾁｬｰｼﾞ",
        }
    }
}

impl Note {
    fn is_train(&self) -> bool {
        matches!(self, Self::Train | Self::ExitByWindow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfCardViewerRowData {
    pub date: NaiveDate,
    pub is_commuter_pass_enter: bool,
    pub railway_company_name_enter: String,
    pub railway_station_name_enter: String,
    pub is_commuter_pass_exit: bool,
    pub railway_company_name_exit: String,
    pub railway_station_name_exit: String,
    pub used_amount: i64,
    pub balance: i64,
    pub note: Note,
}

impl SfCardViewerRowData {
    fn is_on_commuter_pass(&self) -> bool {
        self.is_commuter_pass_enter || self.is_commuter_pass_exit
    }

    fn route(&self) -> String {
        format!(
            "{} {} → {} {}",
            self.railway_company_name_enter,
            self.railway_station_name_enter,
            self.railway_company_name_exit,
            self.railway_station_name_exit
        )
    }
}

impl RowData for SfCardViewerRowData {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn store_name(&self) -> &str {
        match self.note {
            Note::Train | Note::ExitByWindow => &self.railway_station_name_exit,
            Note::SalesGoods | Note::Bus => &self.railway_station_name_enter,
            Note::AutoCharge => "",
        }
    }
}

pub struct SfCardViewer;

impl Vendor for SfCardViewer {
    type Data = SfCardViewerRowData;

    const ACCOUNT: AccountType = AccountType::SfCardViewer;
    const FRAMING: Framing = Framing {
        header: &[
            "利用年月日",
            "定期",
            "鉄道会社名",
            "入場駅/事業者名",
            "定期",
            "鉄道会社名",
            "出場駅/降車場所",
            "利用額",
            "残額",
            "メモ",
        ],
        header_window: 1,
        footer: None,
        footer_window: 0,
    };

    fn encoding() -> &'static Encoding {
        SHIFT_JIS
    }

    fn parse(cells: &[String]) -> Result<SfCardViewerRowData, InvalidRecordError> {
        let mut r = CellReader::new(cells, 10)?;
        let date = r.date(0, "date");
        let is_commuter_pass_enter = r.flag(1, "is_commuter_pass_enter", COMMUTER_PASS);
        let railway_company_name_enter = r.text(2);
        let railway_station_name_enter = r.text(3);
        let is_commuter_pass_exit = r.flag(4, "is_commuter_pass_exit", COMMUTER_PASS);
        let railway_company_name_exit = r.text(5);
        let railway_station_name_exit = r.text(6);
        let used_amount = r.magnitude(7, "used_amount");
        let balance = r.amount(8, "balance");
        let note = r.code(9, "note");
        let (
            Some(date),
            Some(is_commuter_pass_enter),
            Some(is_commuter_pass_exit),
            Some(used_amount),
            Some(balance),
            Some(note),
        ) = (
            date,
            is_commuter_pass_enter,
            is_commuter_pass_exit,
            used_amount,
            balance,
            note,
        )
        else {
            return Err(r.into_error());
        };
        Ok(SfCardViewerRowData {
            date,
            is_commuter_pass_enter,
            railway_company_name_enter,
            railway_station_name_enter,
            is_commuter_pass_exit,
            railway_company_name_exit,
            railway_station_name_exit,
            used_amount,
            balance,
            note,
        })
    }

    fn is_row_to_skip(row: &Row<'_, SfCardViewerRowData>, settings: &Settings) -> bool {
        let data = row.data();
        match data.note {
            Note::SalesGoods => settings.sf_card_viewer.skip_sales_goods_row,
            note if note.is_train() => data.used_amount == 0 && data.is_on_commuter_pass(),
            _ => false,
        }
    }

    fn check(row: &Row<'_, SfCardViewerRowData>, _settings: &Settings) -> Vec<InvalidCellError> {
        let data = row.data();
        if data.note.is_train() && data.railway_station_name_exit.is_empty() {
            return vec![InvalidCellError::Rule("Exit station is required in train row.".to_string())];
        }
        Vec::new()
    }

    fn convert(row: &Row<'_, SfCardViewerRowData>, settings: &Settings) -> LedgerRow {
        let data = row.data();
        let account = &settings.sf_card_viewer.account_name;
        match data.note {
            Note::Train | Note::ExitByWindow => LedgerRow::Payment(
                PaymentRow::at_store(data.date, row.store(), account, data.used_amount).with_note(data.route()),
            ),
            Note::SalesGoods | Note::Bus => {
                LedgerRow::Payment(PaymentRow::at_store(data.date, row.store(), account, data.used_amount))
            }
            Note::AutoCharge => LedgerRow::Transfer(TransferRow::new(
                data.date,
                &settings.sf_card_viewer.auto_charge_source,
                account,
                data.used_amount,
            )),
        }
    }
}
