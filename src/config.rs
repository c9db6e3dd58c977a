use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_LIFF_ID: &str = "1668676101-JZwvBDDL";

const CONFIG_DIR_NAME: &str = "helpdesk";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub liff_id: String,
    pub token: Option<String>,
    pub line_sdk_enabled: bool,
    pub line_access_token: Option<String>,
    pub line_in_client: bool,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Ok(Self::resolve(stored, |key| env::var(key).ok()))
    }

    /// Environment values win over the stored file, which wins over the
    /// built-in defaults. Empty values count as unset.
    fn resolve(stored: StoredConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = var("HELPDESK_API_URL")
            .or(stored.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let liff_id = var("HELPDESK_LIFF_ID")
            .or(stored.liff_id)
            .unwrap_or_else(|| DEFAULT_LIFF_ID.to_string());
        let token = var("HELPDESK_TOKEN").or(stored.token);
        let line_access_token = var("HELPDESK_LINE_ACCESS_TOKEN").or(stored.line_access_token);
        let line_sdk_enabled = var("HELPDESK_LINE_SDK")
            .map(|value| parse_flag(&value))
            .or(stored.line_sdk)
            .unwrap_or(false);
        let line_in_client = var("HELPDESK_LINE_IN_CLIENT")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Self {
            api_base_url,
            liff_id,
            token,
            line_sdk_enabled,
            line_access_token,
            line_in_client,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Settings persisted between invocations, including the bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liff_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_sdk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_access_token: Option<String>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid config file: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to locate a user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
