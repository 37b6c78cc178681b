use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use collector_adapter::{TenantConfig, normalize_base_url};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{
    KEY_SERVICE_URL, KEY_TENANT_INPUT, KEY_USER_ID, KEY_VALIDATED_TENANT, SettingsStore,
    settings_from_map,
};

/// JSON file backed settings store
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl JsonSettingsStore {
    /// Open the store at the default location (`<data_dir>/wms-collector/settings.json`)
    pub async fn new() -> Result<Self> {
        Self::open(default_settings_path()?).await
    }

    /// Open the store at an explicit path, creating parent directories
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create settings dir {}", parent.display()))?;
        }
        let values = Self::load(&path).await;
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unreadable or corrupt files read as empty settings
    async fn load(path: &Path) -> HashMap<String, String> {
        if !path.exists() {
            return HashMap::new();
        }
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read settings");
                return HashMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring corrupt settings file");
                HashMap::new()
            }
        }
    }

    /// The cache only takes the new entries once they are on disk
    async fn update(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut values = self.values.lock().await;
        let mut updated = values.clone();
        for (key, value) in entries {
            updated.insert((*key).to_string(), value.clone());
        }
        self.persist(&updated).await?;
        *values = updated;
        Ok(())
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)?;

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.path).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn get_settings(&self) -> TenantConfig {
        settings_from_map(&*self.values.lock().await)
    }

    async fn save_settings(&self, service_url: &str, tenant_input: &str) -> Result<()> {
        self.update(&[
            (KEY_SERVICE_URL, normalize_base_url(service_url)),
            (KEY_TENANT_INPUT, tenant_input.trim().to_string()),
        ])
        .await
    }

    async fn save_validated_tenant_code(&self, code: &str) -> Result<()> {
        self.update(&[(KEY_VALIDATED_TENANT, code.to_string())]).await
    }

    async fn save_user_id(&self, user_id: i64) -> Result<()> {
        self.update(&[(KEY_USER_ID, user_id.to_string())]).await
    }
}

pub fn default_settings_path() -> Result<PathBuf> {
    Ok(dirs::data_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("wms-collector")
        .join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settings_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");

        let store = JsonSettingsStore::open(&path).await.expect("open store");
        store
            .save_settings("https://wms.example.com/", "ACME")
            .await
            .expect("save settings");
        store.save_validated_tenant_code("ACME01").await.expect("save code");
        store.save_user_id(42).await.expect("save user");

        let reopened = JsonSettingsStore::open(&path).await.expect("reopen store");
        let settings = reopened.get_settings().await;
        assert_eq!(settings.service_url, "https://wms.example.com");
        assert_eq!(settings.tenant_input, "ACME");
        assert_eq!(settings.validated_tenant_code.as_deref(), Some("ACME01"));
        assert_eq!(settings.user_id, 42);
    }

    #[tokio::test]
    async fn test_values_are_string_encoded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let store = JsonSettingsStore::open(&path).await.expect("open store");
        store.save_user_id(7).await.expect("save user");

        let raw = std::fs::read_to_string(&path).expect("read file");
        let values: HashMap<String, String> = serde_json::from_str(&raw).expect("decode");
        assert_eq!(values.get(KEY_USER_ID).map(String::as_str), Some("7"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let store = JsonSettingsStore::open(&path).await.expect("open store");
        store.save_user_id(7).await.expect("save user");

        // a directory where the temp file goes makes the write fail
        std::fs::create_dir(path.with_extension("tmp")).expect("block temp file");
        assert!(store.save_user_id(8).await.is_err());
        assert!(store.save_settings("http://outro", "OUTRO").await.is_err());

        let settings = store.get_settings().await;
        assert_eq!(settings.user_id, 7);
        assert_eq!(settings.service_url, "");
        let reopened = JsonSettingsStore::open(&path).await.expect("reopen store");
        assert_eq!(reopened.get_settings().await.user_id, 7);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").expect("write garbage");

        let store = JsonSettingsStore::open(&path).await.expect("open store");
        assert_eq!(store.get_settings().await, TenantConfig::default());
    }
}
