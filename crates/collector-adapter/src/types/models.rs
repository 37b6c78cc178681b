/*
[INPUT]:  Backend task payload schema and local settings
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::enums::{OperationKind, TaskStatus};
use super::serde_helpers;

/// Tenant and service settings handed to the transport and the app.
///
/// `service_url` is kept without a trailing slash and `validated_tenant_code`
/// is only filled after the backend accepted the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    pub service_url: String,
    pub tenant_input: String,
    pub validated_tenant_code: Option<String>,
    /// Zero until a login stored a user id
    pub user_id: i64,
}

impl TenantConfig {
    pub fn new(service_url: &str, tenant_input: &str) -> Self {
        Self {
            service_url: normalize_base_url(service_url),
            tenant_input: tenant_input.trim().to_string(),
            validated_tenant_code: None,
            user_id: 0,
        }
    }

    pub fn has_service_url(&self) -> bool {
        !self.service_url.is_empty()
    }

    pub fn is_validated(&self) -> bool {
        self.validated_tenant_code
            .as_deref()
            .is_some_and(|code| !code.is_empty())
    }
}

/// Strip surrounding whitespace and trailing slashes from a base URL
pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Tenant + user pair required by every task-lifecycle call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub tenant_code: String,
    pub user_id: i64,
}

impl SessionIdentity {
    pub fn new(tenant_code: impl Into<String>, user_id: i64) -> Self {
        Self {
            tenant_code: tenant_code.into(),
            user_id,
        }
    }
}

/// Local mirror of a backend task (`DadosTarefa` / `TarefaUsuario` / `TarefasLivres[]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "IdTarefa")]
    pub id: i64,
    /// Raw operation name, echoed back as `nomeOperacao`
    #[serde(rename = "NomeOperacao", default, deserialize_with = "serde_helpers::null_as_default")]
    pub operation_name: String,
    #[serde(
        rename = "DescrTarefa",
        alias = "DescricaoTarefa",
        default,
        deserialize_with = "serde_helpers::null_as_default"
    )]
    pub description: String,
    #[serde(rename = "Instrucao", default, deserialize_with = "serde_helpers::null_as_default")]
    pub instruction: String,
    #[serde(rename = "StatusTarefa", default, deserialize_with = "serde_helpers::null_as_default")]
    pub status: TaskStatus,
    #[serde(rename = "FlEncerrada", default, deserialize_with = "serde_helpers::null_as_default")]
    pub closed: bool,
    #[serde(rename = "ProxMaterial", default, skip_serializing_if = "Option::is_none")]
    pub next_material_hint: Option<String>,
    #[serde(
        rename = "QtdRestante",
        default,
        deserialize_with = "serde_helpers::deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub remaining_qty: Option<String>,
    #[serde(rename = "PosicaoOrigem", default, skip_serializing_if = "Option::is_none")]
    pub source_position: Option<String>,
    #[serde(rename = "PosicaoDestino", default, skip_serializing_if = "Option::is_none")]
    pub dest_position: Option<String>,
    #[serde(
        rename = "Operador",
        default,
        deserialize_with = "serde_helpers::deserialize_lenient_i64",
        skip_serializing_if = "Option::is_none"
    )]
    pub operator_id: Option<i64>,
    #[serde(rename = "NumVolumesLidos", default, skip_serializing_if = "Option::is_none")]
    pub volumes_read: Option<i64>,
}

impl Task {
    pub fn operation_kind(&self) -> OperationKind {
        OperationKind::parse(&self.operation_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_deserialize_full_payload() {
        let payload = json!({
            "IdTarefa": 42,
            "NomeOperacao": "INVENTÁRIO",
            "DescrTarefa": "Inventário - Setor A",
            "ProxMaterial": "PARAFUSO M6",
            "QtdRestante": 12,
            "PosicaoOrigem": "A-01-02",
            "PosicaoDestino": "B-03-01",
            "StatusTarefa": "EM ANDAMENTO",
            "FlEncerrada": false,
            "Operador": "7",
            "Instrucao": "Leia o endereço",
            "NumVolumesLidos": 3
        });

        let task: Task = serde_json::from_value(payload).expect("decode task");
        assert_eq!(task.id, 42);
        assert_eq!(task.operation_kind(), OperationKind::Inventory);
        assert_eq!(task.description, "Inventário - Setor A");
        assert_eq!(task.remaining_qty.as_deref(), Some("12"));
        assert_eq!(task.operator_id, Some(7));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.volumes_read, Some(3));
    }

    #[test]
    fn test_task_description_alias() {
        let payload = json!({
            "IdTarefa": 1,
            "NomeOperacao": "EMBALAGEM",
            "DescricaoTarefa": "Embalagem - Pedido 9",
            "Operador": null
        });

        let task: Task = serde_json::from_value(payload).expect("decode task");
        assert_eq!(task.description, "Embalagem - Pedido 9");
        assert_eq!(task.operator_id, None);
        assert_eq!(task.instruction, "");
        assert!(task.next_material_hint.is_none());
    }

    #[test]
    fn test_null_fields_read_as_defaults() {
        let payload = json!({
            "IdTarefa": 8,
            "NomeOperacao": null,
            "DescrTarefa": null,
            "Instrucao": null,
            "StatusTarefa": null,
            "FlEncerrada": null,
            "QtdRestante": null
        });

        let task: Task = serde_json::from_value(payload).expect("decode task");
        assert_eq!(task.id, 8);
        assert_eq!(task.operation_name, "");
        assert_eq!(task.description, "");
        assert_eq!(task.instruction, "");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.closed);
        assert_eq!(task.remaining_qty, None);
    }

    #[test]
    fn test_operator_non_numeric_is_dropped() {
        let payload = json!({ "IdTarefa": 5, "Operador": "JOAO" });
        let task: Task = serde_json::from_value(payload).expect("decode task");
        assert_eq!(task.operator_id, None);
    }

    #[test]
    fn test_tenant_config_normalizes_url() {
        let config = TenantConfig::new("  https://wms.example.com/// ", " ACME ");
        assert_eq!(config.service_url, "https://wms.example.com");
        assert_eq!(config.tenant_input, "ACME");
        assert!(config.has_service_url());
        assert!(!config.is_validated());
    }

    #[test]
    fn test_empty_validated_code_is_not_validated() {
        let mut config = TenantConfig::new("https://wms.example.com", "ACME");
        config.validated_tenant_code = Some(String::new());
        assert!(!config.is_validated());
        config.validated_tenant_code = Some("T-1".to_string());
        assert!(config.is_validated());
    }
}
