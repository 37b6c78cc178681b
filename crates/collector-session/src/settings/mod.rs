/*
[INPUT]:  Service URL, tenant input, validated tenant code, user id
[OUTPUT]: TenantConfig snapshots for the transport and the app
[POS]:    Settings layer - the only process-wide shared state
[UPDATE]: When persisted keys or store backends change
*/

pub mod storage;

use std::collections::HashMap;

use async_trait::async_trait;
use collector_adapter::{TenantConfig, normalize_base_url};
use tokio::sync::Mutex;

pub use storage::JsonSettingsStore;

/// Fixed persisted key names; values are string-encoded
pub const KEY_SERVICE_URL: &str = "url_apis";
pub const KEY_TENANT_INPUT: &str = "tenant_code_input";
pub const KEY_VALIDATED_TENANT: &str = "validated_tenant_code";
pub const KEY_USER_ID: &str = "user_id";

/// Small key-value store behind the settings screen.
///
/// Reads never fail: missing or unparsable keys come back empty / zero.
/// Writes are last-write-wins per key.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_settings(&self) -> TenantConfig;

    async fn save_settings(&self, service_url: &str, tenant_input: &str) -> anyhow::Result<()>;

    async fn save_validated_tenant_code(&self, code: &str) -> anyhow::Result<()>;

    async fn save_user_id(&self, user_id: i64) -> anyhow::Result<()>;
}

/// Decode the raw key map into a settings snapshot
pub(crate) fn settings_from_map(values: &HashMap<String, String>) -> TenantConfig {
    let text = |key: &str| values.get(key).cloned().unwrap_or_default();
    let validated = text(KEY_VALIDATED_TENANT);

    TenantConfig {
        service_url: normalize_base_url(&text(KEY_SERVICE_URL)),
        tenant_input: text(KEY_TENANT_INPUT),
        validated_tenant_code: (!validated.is_empty()).then_some(validated),
        user_id: values
            .get(KEY_USER_ID)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0),
    }
}

/// In-process store; nothing outlives the process
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with a service URL and a validated tenant
    pub fn with_tenant(service_url: &str, tenant_input: &str, validated_code: &str) -> Self {
        let values = HashMap::from([
            (KEY_SERVICE_URL.to_string(), normalize_base_url(service_url)),
            (KEY_TENANT_INPUT.to_string(), tenant_input.to_string()),
            (KEY_VALIDATED_TENANT.to_string(), validated_code.to_string()),
        ]);
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get_settings(&self) -> TenantConfig {
        settings_from_map(&*self.values.lock().await)
    }

    async fn save_settings(&self, service_url: &str, tenant_input: &str) -> anyhow::Result<()> {
        let mut values = self.values.lock().await;
        values.insert(KEY_SERVICE_URL.to_string(), normalize_base_url(service_url));
        values.insert(KEY_TENANT_INPUT.to_string(), tenant_input.trim().to_string());
        Ok(())
    }

    async fn save_validated_tenant_code(&self, code: &str) -> anyhow::Result<()> {
        self.values
            .lock()
            .await
            .insert(KEY_VALIDATED_TENANT.to_string(), code.to_string());
        Ok(())
    }

    async fn save_user_id(&self, user_id: i64) -> anyhow::Result<()> {
        self.values
            .lock()
            .await
            .insert(KEY_USER_ID.to_string(), user_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_defaults() {
        let store = MemorySettingsStore::new();
        let settings = store.get_settings().await;
        assert_eq!(settings, TenantConfig::default());
    }

    #[tokio::test]
    async fn test_saves_are_visible() {
        let store = MemorySettingsStore::new();
        store
            .save_settings("https://wms.example.com/", "ACME")
            .await
            .expect("save settings");
        store.save_validated_tenant_code("ACME01").await.expect("save code");
        store.save_user_id(7).await.expect("save user");

        let settings = store.get_settings().await;
        assert_eq!(settings.service_url, "https://wms.example.com");
        assert_eq!(settings.tenant_input, "ACME");
        assert_eq!(settings.validated_tenant_code.as_deref(), Some("ACME01"));
        assert_eq!(settings.user_id, 7);
    }

    #[test]
    fn test_corrupt_user_id_reads_as_zero() {
        let values = HashMap::from([(KEY_USER_ID.to_string(), "abc".to_string())]);
        assert_eq!(settings_from_map(&values).user_id, 0);
    }
}
