/*
[INPUT]:  Mock server and scripted backend replies
[OUTPUT]: Apps wired to the mock server, task payloads, mount helpers
[POS]:    Test infrastructure - shared across session integration tests
[UPDATE]: When adding new workflow fixtures
*/

use std::sync::Arc;

use collector_adapter::ClientConfig;
use collector_session::{CollectorApp, MemorySettingsStore};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TENANT_INPUT: &str = "ACME";
pub const TENANT_CODE: &str = "ACME01";

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// App whose settings already point at the mock server with a validated tenant
pub fn app_for(server: &MockServer) -> CollectorApp<MemorySettingsStore> {
    let store = MemorySettingsStore::with_tenant(&server.uri(), TENANT_INPUT, TENANT_CODE);
    CollectorApp::new(Arc::new(store), ClientConfig::default())
}

#[allow(dead_code)]
pub fn task_payload(id: i64, operation: &str, instruction: &str) -> Value {
    json!({
        "IdTarefa": id,
        "NomeOperacao": operation,
        "DescrTarefa": format!("{operation} - tarefa {id}"),
        "StatusTarefa": "PENDENTE",
        "FlEncerrada": false,
        "Instrucao": instruction,
        "ProxMaterial": "PARAFUSO M6",
        "QtdRestante": 10,
        "Operador": "7"
    })
}

/// Login that lands on the open-task list, plus the list itself
#[allow(dead_code)]
pub async fn mount_login_to_list(server: &MockServer, tasks: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path("/api/coletor/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Ok": true,
            "IdUsuario": 7,
            "TarefaUsuario": null,
            "TarefasLivres": tasks.clone(),
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/coletor/TarefasLivresUsuario"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Ok": true,
            "TarefasLivres": tasks,
        })))
        .mount(server)
        .await;
}

/// Any task lifecycle endpoint answering with `reply`
#[allow(dead_code)]
pub async fn mount_task_endpoint(server: &MockServer, endpoint: &str, reply: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/coletor/tarefa/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}
