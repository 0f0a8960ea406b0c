use std::sync::OnceLock;

use regex::RegexSet;

use crate::error::{ConvertError, Result};

/// Which convert table a vendor resolves its names against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Store,
    Item,
}

impl TableKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Item => "item",
        }
    }
}

/// Input vendor formats, one per source institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountType {
    Waon,
    Mufg,
    SfCardViewer,
    Amazon,
    ViewCard,
}

impl AccountType {
    pub const ALL: &'static [AccountType] = &[
        AccountType::Waon,
        AccountType::Mufg,
        AccountType::SfCardViewer,
        AccountType::Amazon,
        AccountType::ViewCard,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Waon => "waon",
            Self::Mufg => "mufg",
            Self::SfCardViewer => "sf_card_viewer",
            Self::Amazon => "amazon",
            Self::ViewCard => "view_card",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Waon => "WAON",
            Self::Mufg => "MUFG Bank",
            Self::SfCardViewer => "SF Card Viewer (PASMO / Suica)",
            Self::Amazon => "Amazon.co.jp order history",
            Self::ViewCard => "View Card",
        }
    }

    /// Input file names this format is selected for.
    pub fn file_name_pattern(&self) -> &'static str {
        match self {
            Self::Waon => r"(?i)^waon.*\.csv$",
            Self::Mufg => r"(?i)^mufg.*\.csv$",
            Self::SfCardViewer => r"(?i)^(sf_card_viewer|pasmo).*\.csv$",
            Self::Amazon => r"(?i)^amazon.*\.csv$",
            Self::ViewCard => r"(?i)^view_card.*\.csv$",
        }
    }

    pub fn table_kind(&self) -> TableKind {
        match self {
            Self::Amazon => TableKind::Item,
            _ => TableKind::Store,
        }
    }

    /// The first format whose file name pattern matches, in `ALL` order.
    pub fn detect(file_name: &str) -> Result<Option<AccountType>> {
        static PATTERNS: OnceLock<std::result::Result<RegexSet, regex::Error>> = OnceLock::new();
        let set = PATTERNS
            .get_or_init(|| RegexSet::new(Self::ALL.iter().map(|a| a.file_name_pattern())))
            .as_ref()
            .map_err(|e| ConvertError::Other(format!("Invalid file name pattern: {e}")))?;
        Ok(set.matches(file_name).iter().next().map(|i| Self::ALL[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(file_name: &str) -> Option<AccountType> {
        AccountType::detect(file_name).unwrap()
    }

    #[test]
    fn test_file_name_patterns_compile() {
        for account in AccountType::ALL {
            assert!(regex::Regex::new(account.file_name_pattern()).is_ok(), "{}", account.key());
        }
    }

    #[test]
    fn test_detect_by_file_name() {
        assert_eq!(detect("waon_201811.csv"), Some(AccountType::Waon));
        assert_eq!(detect("MUFG.csv"), Some(AccountType::Mufg));
        assert_eq!(detect("pasmo201811.csv"), Some(AccountType::SfCardViewer));
        assert_eq!(detect("sf_card_viewer.csv"), Some(AccountType::SfCardViewer));
        assert_eq!(detect("amazon.csv"), Some(AccountType::Amazon));
        assert_eq!(detect("view_card_201811.csv"), Some(AccountType::ViewCard));
        assert_eq!(detect("rakuten.csv"), None);
        assert_eq!(detect("waon.txt"), None);
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = AccountType::ALL.iter().map(|a| a.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), AccountType::ALL.len());
    }

    #[test]
    fn test_amazon_resolves_items() {
        assert_eq!(AccountType::Amazon.table_kind(), TableKind::Item);
        assert_eq!(AccountType::Waon.table_kind(), TableKind::Store);
    }
}
