/*
[INPUT]:  Backend response schema
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use super::models::Task;
use super::serde_helpers;

/// `{Ok, MensErro}` reply used by logout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(rename = "Ok", default, deserialize_with = "serde_helpers::null_as_default")]
    pub ok: bool,
    #[serde(rename = "MensErro", default)]
    pub error_message: Option<String>,
}

/// Reply of every tarefa endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(rename = "Ok", default, deserialize_with = "serde_helpers::null_as_default")]
    pub ok: bool,
    #[serde(rename = "MensErro", default)]
    pub error_message: Option<String>,
    #[serde(rename = "DadosTarefa", default)]
    pub task: Option<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTasksResponse {
    #[serde(rename = "Ok", default, deserialize_with = "serde_helpers::null_as_default")]
    pub ok: bool,
    #[serde(rename = "MensErro", default)]
    pub error_message: Option<String>,
    #[serde(
        rename = "TarefasLivres",
        default,
        deserialize_with = "serde_helpers::null_as_default"
    )]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "Ok", default, deserialize_with = "serde_helpers::null_as_default")]
    pub ok: bool,
    #[serde(rename = "MensErro", default)]
    pub error_message: Option<String>,
    #[serde(rename = "IdUsuario", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "TarefaUsuario", default)]
    pub active_task: Option<Task>,
    #[serde(rename = "TarefasLivres", default)]
    pub open_tasks: Option<Vec<Task>>,
}

/// Tenant validation reply; the backend has used both spellings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantValidationResponse {
    #[serde(rename = "tenatCode", default, skip_serializing_if = "Option::is_none")]
    pub tenat_code: Option<String>,
    #[serde(rename = "tenantCode", default, skip_serializing_if = "Option::is_none")]
    pub tenant_code: Option<String>,
}

impl TenantValidationResponse {
    /// The validated code under either accepted key; empty strings count as missing
    pub fn validated_code(&self) -> Option<&str> {
        [self.tenat_code.as_deref(), self.tenant_code.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|code| !code.is_empty())
    }
}

/// Where a successful login sends the worker
#[derive(Debug, Clone, PartialEq)]
pub enum LoginEntry {
    ActiveTask(Task),
    OpenTasks(Vec<Task>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user_id: i64,
    pub entry: LoginEntry,
}
