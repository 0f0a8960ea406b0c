pub mod amazon;
pub mod mufg;
pub mod sf_card_viewer;
pub mod view_card;
pub mod waon;

use encoding_rs::Encoding;

use crate::error::{InvalidCellError, InvalidRecordError};
use crate::framing::Framing;
use crate::ledger::LedgerRow;
use crate::models::AccountType;
use crate::row::{Row, RowData};
use crate::settings::Settings;

pub use amazon::Amazon;
pub use mufg::Mufg;
pub use sf_card_viewer::SfCardViewer;
pub use view_card::ViewCard;
pub use waon::Waon;

/// Parser, classifier and converter for one vendor format.
pub trait Vendor {
    type Data: RowData;

    const ACCOUNT: AccountType;
    const FRAMING: Framing;

    fn encoding() -> &'static Encoding;

    /// Cell-level parsing; all fields are attempted before failing.
    fn parse(cells: &[String]) -> Result<Self::Data, InvalidRecordError>;

    /// Rows dropped without output or error.
    fn is_row_to_skip(_row: &Row<'_, Self::Data>, _settings: &Settings) -> bool {
        false
    }

    /// Vendor rules layered on top of the reference check.
    fn check(_row: &Row<'_, Self::Data>, _settings: &Settings) -> Vec<InvalidCellError> {
        Vec::new()
    }

    fn convert(row: &Row<'_, Self::Data>, settings: &Settings) -> LedgerRow;
}

pub enum Classified<'t, D> {
    Skip,
    Invalid(InvalidRecordError),
    Valid(Row<'t, D>),
}

/// Skip wins over invalid; the reference check always runs before vendor rules.
pub fn classify<'t, V: Vendor>(mut row: Row<'t, V::Data>, settings: &Settings) -> Classified<'t, V::Data> {
    if V::is_row_to_skip(&row, settings) {
        return Classified::Skip;
    }
    row.check_references();
    for error in V::check(&row, settings) {
        row.stock(error);
    }
    if row.is_invalid() {
        Classified::Invalid(row.into_error())
    } else {
        Classified::Valid(row)
    }
}

impl AccountType {
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            Self::Waon => Waon::encoding(),
            Self::Mufg => Mufg::encoding(),
            Self::SfCardViewer => SfCardViewer::encoding(),
            Self::Amazon => Amazon::encoding(),
            Self::ViewCard => ViewCard::encoding(),
        }
    }
}
