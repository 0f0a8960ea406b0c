use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub waon: WaonSettings,
    pub mufg: MufgSettings,
    pub sf_card_viewer: SfCardViewerSettings,
    pub amazon: AmazonSettings,
    pub view_card: ViewCardSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Account that cash deposits come from and withdrawals go to.
    pub cash_account_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            cash_account_name: "お財布".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaonSettings {
    pub account_name: String,
    pub auto_charge_source: String,
}

impl Default for WaonSettings {
    fn default() -> Self {
        Self {
            account_name: "WAON".to_string(),
            auto_charge_source: "イオン銀行".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MufgSettings {
    pub account_name: String,
}

impl Default for MufgSettings {
    fn default() -> Self {
        Self {
            account_name: "三菱UFJ銀行".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SfCardViewerSettings {
    pub account_name: String,
    pub auto_charge_source: String,
    pub skip_sales_goods_row: bool,
}

impl Default for SfCardViewerSettings {
    fn default() -> Self {
        Self {
            account_name: "PASMO".to_string(),
            auto_charge_source: "TOKYU CARD".to_string(),
            skip_sales_goods_row: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmazonSettings {
    pub store_name: String,
    pub payment_account_name: String,
}

impl Default for AmazonSettings {
    fn default() -> Self {
        Self {
            store_name: "Amazon Japan G.K.".to_string(),
            payment_account_name: "ヨドバシゴールドポイントカード・プラス".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewCardSettings {
    pub account_name: String,
    /// Amazon purchases are converted from the order history instead.
    pub skip_amazon_row: bool,
    /// Suica auto charges are converted from the transit card history instead.
    pub skip_suica_auto_charge_row: bool,
}

impl Default for ViewCardSettings {
    fn default() -> Self {
        Self {
            account_name: "ビューカード".to_string(),
            skip_amazon_row: true,
            skip_suica_auto_charge_row: true,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kakeibo")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load from `path` when given, else from the default location, else defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => read_settings(path),
        None => {
            let path = settings_path();
            if path.exists() {
                read_settings(&path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConvertError::Settings(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ConvertError::Settings(format!("{}: {e}", path.display())))
}
