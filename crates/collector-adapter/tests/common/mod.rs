/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for collector-adapter tests

use collector_adapter::{ClientConfig, CollectorClient, SessionIdentity};
use serde_json::{Value, json};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> CollectorClient {
    CollectorClient::with_base_url(ClientConfig::default(), &server.uri()).expect("client init")
}

pub fn identity() -> SessionIdentity {
    SessionIdentity::new("ACME01", 7)
}

/// Backend task payload for tests
#[allow(dead_code)]
pub fn task_payload(id: i64, operation: &str, instruction: &str) -> Value {
    json!({
        "IdTarefa": id,
        "NomeOperacao": operation,
        "DescrTarefa": format!("{operation} - tarefa {id}"),
        "StatusTarefa": "EM ANDAMENTO",
        "FlEncerrada": false,
        "Instrucao": instruction,
        "Operador": 7
    })
}
