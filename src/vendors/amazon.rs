//! Amazon.co.jp order history, one line per ordered item (UTF-8).
//!
//! Every order also has a `（注文全体）` summary line, and may carry discount
//! lines (`（割引）`, `（Amazonポイント）`, `（クーポン）`) whose price is the
//! discounted amount.

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};

use crate::cells::CellReader;
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::{LedgerRow, PaymentRow};
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

use super::Vendor;

const ORDER_SUMMARY: &str = "（注文全体）";
const DISCOUNTS: &[&str] = &["（割引）", "（Amazonポイント）", "（クーポン）"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmazonRowData {
    pub ordered_date: NaiveDate,
    pub order_id: String,
    pub item_name: String,
    pub note: String,
    pub price: Option<i64>,
    pub number: Option<i64>,
    pub subtotal_price_item: Option<i64>,
    pub total_order: Option<i64>,
    pub destination: String,
    pub status: String,
    pub billing_address: String,
    pub billing_amount: Option<i64>,
    pub credit_card_billing_amount: Option<i64>,
    pub credit_card_billing_date: Option<NaiveDate>,
    pub url_item: String,
}

impl AmazonRowData {
    pub fn is_order_summary(&self) -> bool {
        self.item_name == ORDER_SUMMARY
    }

    pub fn is_discount(&self) -> bool {
        DISCOUNTS.contains(&self.item_name.as_str())
    }
}

impl RowData for AmazonRowData {
    fn date(&self) -> NaiveDate {
        self.ordered_date
    }

    // Summary and discount lines are not products.
    fn item_name(&self) -> &str {
        if self.is_order_summary() || self.is_discount() {
            ""
        } else {
            &self.item_name
        }
    }
}

pub struct Amazon;

impl Vendor for Amazon {
    type Data = AmazonRowData;

    const ACCOUNT: AccountType = AccountType::Amazon;
    const FRAMING: Framing = Framing {
        header: &[
            "注文日",
            "注文番号",
            "商品名",
            "付帯情報",
            "価格",
            "個数",
            "商品小計",
            "注文合計",
            "お届け先",
            "状態",
            "請求先",
            "請求額",
            "クレカ請求額",
            "クレカ請求日",
            "商品URL",
        ],
        header_window: 1,
        footer: None,
        footer_window: 0,
    };

    fn encoding() -> &'static Encoding {
        UTF_8
    }

    fn parse(cells: &[String]) -> Result<AmazonRowData, InvalidRecordError> {
        let mut r = CellReader::new(cells, 15)?;
        let ordered_date = r.date(0, "ordered_date");
        let order_id = r.text(1);
        let item_name = r.text(2);
        let note = r.text(3);
        let price = r.optional_magnitude(4, "price");
        let number = r.optional_count(5, "number");
        let subtotal_price_item = r.optional_magnitude(6, "subtotal_price_item");
        let total_order = r.optional_magnitude(7, "total_order");
        let destination = r.text(8);
        let status = r.text(9);
        let billing_address = r.text(10);
        let billing_amount = r.optional_magnitude(11, "billing_amount");
        let credit_card_billing_amount = r.optional_magnitude(12, "credit_card_billing_amount");
        let credit_card_billing_date = r.optional_date(13, "credit_card_billing_date");
        let url_item = r.text(14);
        let Some(ordered_date) = ordered_date else {
            return Err(r.into_error());
        };
        r.finish()?;
        Ok(AmazonRowData {
            ordered_date,
            order_id,
            item_name,
            note,
            price,
            number,
            subtotal_price_item,
            total_order,
            destination,
            status,
            billing_address,
            billing_amount,
            credit_card_billing_amount,
            credit_card_billing_date,
            url_item,
        })
    }

    fn is_row_to_skip(row: &Row<'_, AmazonRowData>, _settings: &Settings) -> bool {
        row.data().is_order_summary()
    }

    fn check(row: &Row<'_, AmazonRowData>, _settings: &Settings) -> Vec<InvalidCellError> {
        let data = row.data();
        let mut errors = Vec::new();
        if data.price.is_none() {
            errors.push(InvalidCellError::Rule("Price in item row is required.".to_string()));
        }
        if !data.is_discount() && data.number.is_none() {
            errors.push(InvalidCellError::Rule("Number in item row is required.".to_string()));
        }
        errors
    }

    fn convert(row: &Row<'_, AmazonRowData>, settings: &Settings) -> LedgerRow {
        let data = row.data();
        let price = data.price.unwrap_or_default();
        let store_name = &settings.amazon.store_name;
        let source = &settings.amazon.payment_account_name;
        if data.is_discount() {
            return LedgerRow::Payment(PaymentRow {
                item_name: Some(data.item_name.clone()),
                ..PaymentRow::of_item(data.ordered_date, None, store_name, source, -price)
            });
        }
        let amount = price * data.number.unwrap_or_default();
        LedgerRow::Payment(PaymentRow::of_item(data.ordered_date, row.item(), store_name, source, amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert_table::tests::item;
    use crate::convert_table::ConvertTable;
    use crate::undefined_content::UndefinedContentError;
    use crate::vendors::testing::{cells, convert, invalid, is_skipped};

    fn table() -> ConvertTable {
        let mut table = ConvertTable::default();
        table
            .add_item(
                AccountType::Amazon,
                item("Fire TV Stick - Alexa対応音声認識リモコン付属", "Fire TV Stick"),
            )
            .unwrap();
        table
    }

    fn row(name: &str, price: &str, number: &str) -> [String; 15] {
        [
            "2018/10/23",
            "123-4567890-1234567",
            name,
            "",
            price,
            number,
            "",
            "4,980",
            "ローソン桜塚",
            "2018年10月23日に発送済み",
            "テストアカウント",
            "4,980",
            "",
            "",
            "https://www.amazon.co.jp/gp/product/B0791TX5P5",
        ]
        .map(String::from)
    }

    const FIRE_TV: &str = "Fire TV Stick - Alexa対応音声認識リモコン付属";

    #[test]
    fn test_parse() {
        let data = Amazon::parse(&row(FIRE_TV, "4,980", "1")).unwrap();
        assert_eq!(data.ordered_date, NaiveDate::from_ymd_opt(2018, 10, 23).unwrap());
        assert_eq!(data.price, Some(4980));
        assert_eq!(data.number, Some(1));
        assert_eq!(data.total_order, Some(4980));
        assert_eq!(data.credit_card_billing_date, None);
        assert_eq!(data.item_name(), FIRE_TV);
    }

    #[test]
    fn test_parse_bad_count() {
        let err = Amazon::parse(&cells(&row(FIRE_TV, "4,980", "one"))).unwrap_err();
        assert_eq!(err.errors[0].to_string(), "Invalid number, could not parse count: one");
    }

    #[test]
    fn test_item_row_is_payment_of_price_times_number() {
        let ledger = convert::<Amazon>(&row(FIRE_TV, "4,980", "2"), &table(), &Settings::default());
        let LedgerRow::Payment(payment) = ledger else { panic!("expected payment") };
        assert_eq!(payment.amount, 9960);
        assert_eq!(payment.item_name.as_deref(), Some("Fire TV Stick"));
        assert_eq!(payment.store_name.as_deref(), Some("Amazon Japan G.K."));
        assert_eq!(payment.cash_flow_source, "ヨドバシゴールドポイントカード・プラス");
        assert_eq!(payment.category_large.as_deref(), Some("大型出費"));
    }

    #[test]
    fn test_unknown_item_is_undefined_content() {
        let err = invalid::<Amazon>(
            &row("Echo Dot (エコードット) 第2世代 - スマートスピーカー with Alexa、ホワイト", "5,980", "1"),
            &table(),
            &Settings::default(),
        );
        assert_eq!(
            err.undefined_content,
            Some(UndefinedContentError::new(
                "test.csv",
                "",
                "Echo Dot (エコードット) 第2世代 - スマートスピーカー with Alexa、ホワイト",
            ))
        );
    }

    #[test]
    fn test_order_summary_is_skipped() {
        assert!(is_skipped::<Amazon>(&row(ORDER_SUMMARY, "", ""), &table(), &Settings::default()));
    }

    #[test]
    fn test_discount_is_negative_payment() {
        let ledger = convert::<Amazon>(&row("（Amazonポイント）", "-300", ""), &table(), &Settings::default());
        let LedgerRow::Payment(payment) = ledger else { panic!("expected payment") };
        assert_eq!(payment.amount, -300);
        assert_eq!(payment.item_name.as_deref(), Some("（Amazonポイント）"));
        assert_eq!(payment.category_large, None);
    }

    #[test]
    fn test_item_row_needs_price_and_number() {
        let err = invalid::<Amazon>(&row(FIRE_TV, "", ""), &table(), &Settings::default());
        let messages: Vec<String> = err.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            ["Price in item row is required.", "Number in item row is required."]
        );
    }
}
