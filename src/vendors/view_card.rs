//! VIEW card billing statement (Shift_JIS).
//!
//! A few lines of card/member metadata come before the header, and a `合計`
//! totals line closes the data region.

use chrono::NaiveDate;
use encoding_rs::{Encoding, SHIFT_JIS};

use crate::cells::CellReader;
use crate::convert_table::Store;
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::{LedgerRow, PaymentRow, TransferRow};
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

use super::Vendor;

const SUICA_AUTO_CHARGE: &[&str] = &["オートチャージ", "ｵｰﾄﾁｬｰｼﾞ"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCardRowData {
    pub used_date: NaiveDate,
    pub used_place: String,
    pub used_amount: Option<i64>,
    pub refund_amount: Option<i64>,
    pub billing_amount: Option<i64>,
    pub number_of_division: String,
    pub current_time_of_division: String,
    pub billing_amount_current_time: Option<i64>,
    pub local_currency_amount: String,
    pub abbreviation_local_currency: String,
    pub exchange_rate: String,
}

impl ViewCardRowData {
    pub fn is_suica_auto_charge(&self) -> bool {
        SUICA_AUTO_CHARGE.iter().any(|s| self.used_place.contains(s))
    }
}

impl RowData for ViewCardRowData {
    fn date(&self) -> NaiveDate {
        self.used_date
    }

    fn store_name(&self) -> &str {
        &self.used_place
    }
}

pub struct ViewCard;

impl Vendor for ViewCard {
    type Data = ViewCardRowData;

    const ACCOUNT: AccountType = AccountType::ViewCard;
    const FRAMING: Framing = Framing {
        header: &[
            "ご利用年月日",
            "ご利用箇所",
            "ご利用額",
            "払戻額",
            "ご請求額（うち手数料・利息）",
            "支払区分（回数）",
            "今回回数",
            "今回ご請求額・弁済金（うち手数料・利息）",
            "現地通貨額",
            "通貨略称",
            "換算レート",
        ],
        header_window: 10,
        footer: Some(&["合計"]),
        footer_window: 3,
    };

    fn encoding() -> &'static Encoding {
        SHIFT_JIS
    }

    fn parse(cells: &[String]) -> Result<ViewCardRowData, InvalidRecordError> {
        let mut r = CellReader::new(cells, 11)?;
        let used_date = r.date(0, "used_date");
        let used_place = r.text(1);
        let used_amount = r.optional_magnitude(2, "used_amount");
        let refund_amount = r.optional_magnitude(3, "refund_amount");
        let billing_amount = r.optional_magnitude(4, "billing_amount");
        let number_of_division = r.text(5);
        let current_time_of_division = r.text(6);
        let billing_amount_current_time = r.optional_magnitude(7, "billing_amount_current_time");
        let local_currency_amount = r.text(8);
        let abbreviation_local_currency = r.text(9);
        let exchange_rate = r.text(10);
        let Some(used_date) = used_date else {
            return Err(r.into_error());
        };
        r.finish()?;
        Ok(ViewCardRowData {
            used_date,
            used_place,
            used_amount,
            refund_amount,
            billing_amount,
            number_of_division,
            current_time_of_division,
            billing_amount_current_time,
            local_currency_amount,
            abbreviation_local_currency,
            exchange_rate,
        })
    }

    fn is_row_to_skip(row: &Row<'_, ViewCardRowData>, settings: &Settings) -> bool {
        let view_card = &settings.view_card;
        (view_card.skip_amazon_row && row.store().is_some_and(Store::is_amazon))
            || (view_card.skip_suica_auto_charge_row && row.data().is_suica_auto_charge())
    }

    fn check(row: &Row<'_, ViewCardRowData>, _settings: &Settings) -> Vec<InvalidCellError> {
        let data = row.data();
        if data.used_amount.is_none() && data.refund_amount.is_none() {
            return vec![InvalidCellError::Rule(
                "Used amount or refund amount is required.".to_string(),
            )];
        }
        Vec::new()
    }

    fn convert(row: &Row<'_, ViewCardRowData>, settings: &Settings) -> LedgerRow {
        let data = row.data();
        let account = &settings.view_card.account_name;
        let Some(used) = data.used_amount else {
            // Refunds stay payments even toward a transfer target.
            let refund = -data.refund_amount.unwrap_or_default();
            return LedgerRow::Payment(PaymentRow::at_store(data.used_date, row.store(), account, refund));
        };
        match row.store().and_then(|s| s.transfer_target.as_deref()) {
            Some(target) => LedgerRow::Transfer(TransferRow::new(data.used_date, account, target, used)),
            None => LedgerRow::Payment(PaymentRow::at_store(data.used_date, row.store(), account, used)),
        }
    }
}
