/*
[INPUT]:  Backend request schema
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

/// Login body. The `login`/`senha` names are still provisional on the backend side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub tenant_code: String,
    pub login: String,
    pub senha: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub tenant_code: String,
    pub id_usuario: i64,
}

/// Envelope shared by the open-tasks query and every task mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActionRequest {
    pub tenant_code: String,
    pub id_tarefa: i64,
    pub id_usuario: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_operacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_barras: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_action_request_field_names() {
        let request = TaskActionRequest {
            tenant_code: "T-1".to_string(),
            id_tarefa: 10,
            id_usuario: 3,
            nome_operacao: Some("INVENTÁRIO".to_string()),
            codigo_barras: Some("7891234567895".to_string()),
        };
        let value = serde_json::to_value(&request).expect("encode request");
        assert_eq!(
            value,
            json!({
                "tenantCode": "T-1",
                "idTarefa": 10,
                "idUsuario": 3,
                "nomeOperacao": "INVENTÁRIO",
                "codigoBarras": "7891234567895"
            })
        );
    }

    #[test]
    fn test_barcode_omitted_when_absent() {
        let request = TaskActionRequest {
            tenant_code: "T-1".to_string(),
            id_tarefa: 0,
            id_usuario: 3,
            nome_operacao: None,
            codigo_barras: None,
        };
        let value = serde_json::to_value(&request).expect("encode request");
        assert_eq!(value, json!({ "tenantCode": "T-1", "idTarefa": 0, "idUsuario": 3 }));
    }
}
