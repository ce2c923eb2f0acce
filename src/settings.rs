use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

pub const ORACLE_URL_ENV: &str = "IKARA_ORACLE_URL";
pub const ORACLE_KEY_ENV: &str = "IKARA_ORACLE_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OracleSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:54321/functions/v1/analyze-art".into(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPreferences {
    pub dark_mode: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub oracle: OracleSettings,
    pub ui: UiPreferences,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> AppSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Oracle settings with `IKARA_ORACLE_URL` / `IKARA_ORACLE_KEY` applied.
    /// Overrides are never written back to disk.
    pub fn oracle(&self) -> OracleSettings {
        let mut oracle = self.settings().oracle;
        if let Ok(url) = env::var(ORACLE_URL_ENV) {
            if !url.trim().is_empty() {
                oracle.endpoint = url;
            }
        }
        if let Ok(key) = env::var(ORACLE_KEY_ENV) {
            if !key.trim().is_empty() {
                oracle.api_key = Some(key);
            }
        }
        oracle
    }

    pub fn update(&self, settings: AppSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        *guard = settings;
        self.persist(&guard)
    }

    pub fn set_dark_mode(&self, dark_mode: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.ui.dark_mode = dark_mode;
        self.persist(&guard)
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
