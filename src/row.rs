use std::cell::OnceCell;

use chrono::NaiveDate;

use crate::convert_table::{ConvertTable, Item, NotDefined, Store};
use crate::error::{InvalidCellError, InvalidRecordError};
use crate::models::AccountType;
use crate::undefined_content::UndefinedContentError;

/// Typed projection of one raw record, one implementation per vendor.
pub trait RowData {
    fn date(&self) -> NaiveDate;

    /// Free-text store name; empty when the row has none.
    fn store_name(&self) -> &str {
        ""
    }

    /// Free-text item name; empty when the row has none.
    fn item_name(&self) -> &str {
        ""
    }
}

/// A parsed record plus its reference lookups and validation errors.
pub struct Row<'t, D> {
    data: D,
    account: AccountType,
    file_name: &'t str,
    table: &'t ConvertTable,
    store: OnceCell<Result<&'t Store, NotDefined>>,
    item: OnceCell<Result<&'t Item, NotDefined>>,
    errors: Vec<InvalidCellError>,
    undefined_content: Option<UndefinedContentError>,
}

impl<'t, D: RowData> Row<'t, D> {
    pub fn new(data: D, account: AccountType, file_name: &'t str, table: &'t ConvertTable) -> Self {
        Self {
            data,
            account,
            file_name,
            table,
            store: OnceCell::new(),
            item: OnceCell::new(),
            errors: Vec::new(),
            undefined_content: None,
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn date(&self) -> NaiveDate {
        self.data.date()
    }

    // Empty names are absent on purpose and never looked up.
    fn store_lookup(&self) -> Option<&Result<&'t Store, NotDefined>> {
        let name = self.data.store_name();
        if name.is_empty() {
            return None;
        }
        Some(
            self.store
                .get_or_init(|| self.table.find_store(self.account, name)),
        )
    }

    fn item_lookup(&self) -> Option<&Result<&'t Item, NotDefined>> {
        let name = self.data.item_name();
        if name.is_empty() {
            return None;
        }
        Some(
            self.item
                .get_or_init(|| self.table.find_item(self.account, name)),
        )
    }

    pub fn store(&self) -> Option<&'t Store> {
        self.store_lookup().and_then(|r| r.as_ref().ok().copied())
    }

    pub fn item(&self) -> Option<&'t Item> {
        self.item_lookup().and_then(|r| r.as_ref().ok().copied())
    }

    /// Base validation: every non-empty store/item name must resolve.
    pub fn check_references(&mut self) {
        let store_miss = self.store_lookup().and_then(|r| r.as_ref().err().cloned());
        let item_miss = self.item_lookup().and_then(|r| r.as_ref().err().cloned());
        if store_miss.is_none() && item_miss.is_none() {
            return;
        }
        self.undefined_content = Some(UndefinedContentError::new(
            self.file_name,
            if store_miss.is_some() { self.data.store_name() } else { "" },
            if item_miss.is_some() { self.data.item_name() } else { "" },
        ));
        for miss in [store_miss, item_miss].into_iter().flatten() {
            self.errors.push(InvalidCellError::Rule(miss.to_string()));
        }
    }

    pub fn stock(&mut self, error: InvalidCellError) {
        self.errors.push(error);
    }

    pub fn is_invalid(&self) -> bool {
        !self.errors.is_empty() || self.undefined_content.is_some()
    }

    pub fn into_error(self) -> InvalidRecordError {
        InvalidRecordError {
            errors: self.errors,
            undefined_content: self.undefined_content,
        }
    }
}
