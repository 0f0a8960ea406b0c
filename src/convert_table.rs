use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::error::{ConvertError, Result};
use crate::models::{AccountType, TableKind};

const AMAZON_STORE_NAMES: &[&str] = &["Amazon Japan G.K.", "Amazon.co.jp"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Store {
    pub name: String,
    #[serde(rename = "name_zaim")]
    pub display_name: String,
    #[serde(default)]
    pub category_payment_large: Option<String>,
    #[serde(default)]
    pub category_payment_small: Option<String>,
    #[serde(default)]
    pub category_income: Option<String>,
    /// Own account money moves to or from when this store appears.
    #[serde(default)]
    pub transfer_target: Option<String>,
}

impl Store {
    pub fn is_amazon(&self) -> bool {
        AMAZON_STORE_NAMES.contains(&self.display_name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(rename = "name_zaim")]
    pub display_name: String,
    #[serde(default)]
    pub category_payment_large: Option<String>,
    #[serde(default)]
    pub category_payment_small: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Store,
    Item,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store => f.write_str("Store"),
            Self::Item => f.write_str("Item"),
        }
    }
}

/// Lookup miss.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} name has not been defined in convert table CSV. {kind} name = {name}")]
pub struct NotDefined {
    pub kind: ContentKind,
    pub name: String,
}

/// Free-text name to canonical store/item, scoped by account type.
#[derive(Debug, Default)]
pub struct ConvertTable {
    stores: HashMap<(AccountType, String), Store>,
    items: HashMap<(AccountType, String), Item>,
}

impl ConvertTable {
    /// Read `<dir>/<account key>.csv` for every account that has one.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut table = Self::default();
        for account in AccountType::ALL {
            let path = dir.join(format!("{}.csv", account.key()));
            if !path.exists() {
                continue;
            }
            let count = table.load_csv(*account, &path)?;
            info!(account = account.key(), count, "loaded convert table");
        }
        Ok(table)
    }

    pub fn load_csv(&mut self, account: AccountType, path: &Path) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut count = 0usize;
        match account.table_kind() {
            TableKind::Store => {
                for result in rdr.deserialize::<Store>() {
                    self.add_store(account, result?)?;
                    count += 1;
                }
            }
            TableKind::Item => {
                for result in rdr.deserialize::<Item>() {
                    self.add_item(account, result?)?;
                    count += 1;
                }
            }
        }
        Ok(count)
    }

    pub fn add_store(&mut self, account: AccountType, store: Store) -> Result<()> {
        let key = (account, store.name.clone());
        if self.stores.contains_key(&key) {
            return Err(duplicate(account, &store.name));
        }
        self.stores.insert(key, store);
        Ok(())
    }

    pub fn add_item(&mut self, account: AccountType, item: Item) -> Result<()> {
        let key = (account, item.name.clone());
        if self.items.contains_key(&key) {
            return Err(duplicate(account, &item.name));
        }
        self.items.insert(key, item);
        Ok(())
    }

    pub fn find_store(&self, account: AccountType, name: &str) -> std::result::Result<&Store, NotDefined> {
        self.stores
            .get(&(account, name.to_string()))
            .ok_or_else(|| NotDefined {
                kind: ContentKind::Store,
                name: name.to_string(),
            })
    }

    pub fn find_item(&self, account: AccountType, name: &str) -> std::result::Result<&Item, NotDefined> {
        self.items
            .get(&(account, name.to_string()))
            .ok_or_else(|| NotDefined {
                kind: ContentKind::Item,
                name: name.to_string(),
            })
    }
}

fn duplicate(account: AccountType, name: &str) -> ConvertError {
    ConvertError::ConvertTable(format!("duplicate name in {} table: {name}", account.key()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn store(name: &str, display_name: &str) -> Store {
        Store {
            name: name.to_string(),
            display_name: display_name.to_string(),
            category_payment_large: Some("食費".to_string()),
            category_payment_small: Some("食料品".to_string()),
            category_income: Some("臨時収入".to_string()),
            transfer_target: None,
        }
    }

    pub(crate) fn item(name: &str, display_name: &str) -> Item {
        Item {
            name: name.to_string(),
            display_name: display_name.to_string(),
            category_payment_large: Some("大型出費".to_string()),
            category_payment_small: Some("家電".to_string()),
        }
    }

    #[test]
    fn test_find_is_scoped_by_account() {
        let mut table = ConvertTable::default();
        table.add_store(AccountType::Waon, store("板橋前野町", "イオンスタイル板橋前野町")).unwrap();
        assert_eq!(
            table.find_store(AccountType::Waon, "板橋前野町").unwrap().display_name,
            "イオンスタイル板橋前野町"
        );
        let miss = table.find_store(AccountType::ViewCard, "板橋前野町").unwrap_err();
        assert_eq!(
            miss.to_string(),
            "Store name has not been defined in convert table CSV. Store name = 板橋前野町"
        );
    }

    #[test]
    fn test_item_miss_message() {
        let table = ConvertTable::default();
        let miss = table.find_item(AccountType::Amazon, "Echo Dot").unwrap_err();
        assert_eq!(
            miss.to_string(),
            "Item name has not been defined in convert table CSV. Item name = Echo Dot"
        );
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut table = ConvertTable::default();
        table.add_store(AccountType::Waon, store("A", "A")).unwrap();
        let err = table.add_store(AccountType::Waon, store("A", "B")).unwrap_err();
        assert!(matches!(err, ConvertError::ConvertTable(_)));
        table.add_store(AccountType::Mufg, store("A", "A")).unwrap();
    }

    #[test]
    fn test_load_dir_reads_store_and_item_tables() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("mufg.csv"),
            "name,name_zaim,category_payment_large,category_payment_small,category_income,transfer_target\n\
             ｶ)ﾏﾙｲ,株式会社丸井,,,,エポスカード\n\
             ﾄｳｷﾖｳﾄﾄﾞｳﾁﾖｳ,東京都,,,給与,\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("amazon.csv"),
            "name,name_zaim,category_payment_large,category_payment_small\n\
             Echo Dot (エコードット) 第2世代,Echo Dot,大型出費,家電\n",
        )
        .unwrap();
        let table = ConvertTable::load_dir(dir.path()).unwrap();

        let marui = table.find_store(AccountType::Mufg, "ｶ)ﾏﾙｲ").unwrap();
        assert_eq!(marui.transfer_target.as_deref(), Some("エポスカード"));
        assert_eq!(marui.category_income, None);
        let tokyo = table.find_store(AccountType::Mufg, "ﾄｳｷﾖｳﾄﾄﾞｳﾁﾖｳ").unwrap();
        assert_eq!(tokyo.category_income.as_deref(), Some("給与"));
        assert_eq!(tokyo.transfer_target, None);

        let echo = table.find_item(AccountType::Amazon, "Echo Dot (エコードット) 第2世代").unwrap();
        assert_eq!(echo.category_payment_small.as_deref(), Some("家電"));
        assert!(table.find_store(AccountType::Waon, "anything").is_err());
    }

    #[test]
    fn test_is_amazon() {
        assert!(store("AMAZON.CO.JP", "Amazon Japan G.K.").is_amazon());
        assert!(!store("ﾏﾙｲ", "株式会社丸井").is_amazon());
    }
}
