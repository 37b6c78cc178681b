/*
[INPUT]:  Session identity, task reference and optional barcode
[OUTPUT]: Updated task payloads from the backend
[POS]:    HTTP layer - task lifecycle endpoints (tarefa endpoints)
[UPDATE]: When adding lifecycle endpoints or changing their bodies
*/

use reqwest::Method;
use tracing::{debug, info, warn};

use crate::http::{CollectorClient, CollectorError, Result};
use crate::types::{SessionIdentity, Task, TaskActionRequest, TaskResponse};

/// Task lifecycle endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEndpoint {
    Start,
    Scan,
    Pause,
    Finish,
    Cancel,
    NewBox,
}

impl TaskEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            TaskEndpoint::Start => "/api/coletor/tarefa/inicia",
            TaskEndpoint::Scan => "/api/coletor/tarefa/dados",
            TaskEndpoint::Pause => "/api/coletor/tarefa/pausa",
            TaskEndpoint::Finish => "/api/coletor/tarefa/encerra",
            TaskEndpoint::Cancel => "/api/coletor/tarefa/cancela",
            TaskEndpoint::NewBox => "/api/coletor/tarefa/novacaixa",
        }
    }

    /// Message used when the backend rejects without saying why
    pub fn fallback_error(self) -> &'static str {
        match self {
            TaskEndpoint::Start => "Falha ao iniciar tarefa",
            TaskEndpoint::Scan => "Erro desconhecido",
            TaskEndpoint::Pause => "Erro ao pausar",
            TaskEndpoint::Finish => "Erro ao encerrar",
            TaskEndpoint::Cancel => "Erro ao cancelar",
            TaskEndpoint::NewBox => "Erro ao gerar caixa",
        }
    }
}

impl CollectorClient {
    /// Start (or resume) a task
    ///
    /// POST /api/coletor/tarefa/inicia
    pub async fn start_task(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
    ) -> Result<Task> {
        self.task_call_with_payload(TaskEndpoint::Start, identity, task_id, operation_name, None)
            .await
    }

    /// Submit a scan; the backend decides whether the barcode is valid
    ///
    /// POST /api/coletor/tarefa/dados
    pub async fn submit_scan(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
        barcode: Option<&str>,
    ) -> Result<Task> {
        self.task_call_with_payload(TaskEndpoint::Scan, identity, task_id, operation_name, barcode)
            .await
    }

    /// POST /api/coletor/tarefa/pausa
    pub async fn pause_task(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
    ) -> Result<Option<Task>> {
        self.task_call(TaskEndpoint::Pause, identity, task_id, operation_name, None)
            .await
    }

    /// POST /api/coletor/tarefa/encerra
    pub async fn finish_task(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
    ) -> Result<Option<Task>> {
        self.task_call(TaskEndpoint::Finish, identity, task_id, operation_name, None)
            .await
    }

    /// POST /api/coletor/tarefa/cancela
    pub async fn cancel_task(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
    ) -> Result<Option<Task>> {
        self.task_call(TaskEndpoint::Cancel, identity, task_id, operation_name, None)
            .await
    }

    /// Open a new packing box
    ///
    /// POST /api/coletor/tarefa/novacaixa
    pub async fn generate_new_box(
        &self,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
    ) -> Result<Task> {
        self.task_call_with_payload(TaskEndpoint::NewBox, identity, task_id, operation_name, None)
            .await
    }

    /// Like [`Self::task_call`] but an `Ok: true` reply must carry `DadosTarefa`
    async fn task_call_with_payload(
        &self,
        endpoint: TaskEndpoint,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
        barcode: Option<&str>,
    ) -> Result<Task> {
        self.task_call(endpoint, identity, task_id, operation_name, barcode)
            .await?
            .ok_or_else(|| CollectorError::InvalidResponse(endpoint.fallback_error().to_string()))
    }

    async fn task_call(
        &self,
        endpoint: TaskEndpoint,
        identity: &SessionIdentity,
        task_id: i64,
        operation_name: &str,
        barcode: Option<&str>,
    ) -> Result<Option<Task>> {
        let body = TaskActionRequest {
            tenant_code: identity.tenant_code.clone(),
            id_tarefa: task_id,
            id_usuario: identity.user_id,
            nome_operacao: Some(operation_name.to_string()),
            codigo_barras: barcode
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        };

        debug!(?endpoint, task_id, operation = operation_name, "task call");
        let builder = self.request(Method::POST, endpoint.path())?.json(&body);
        let reply: TaskResponse = self.send_envelope(builder).await?;

        if !reply.ok {
            warn!(
                ?endpoint,
                task_id,
                message = reply.error_message.as_deref().unwrap_or_default(),
                "task call rejected"
            );
            return Err(CollectorError::application(
                reply.error_message,
                endpoint.fallback_error(),
            ));
        }

        info!(?endpoint, task_id, "task call accepted");
        Ok(reply.task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(TaskEndpoint::Start.path(), "/api/coletor/tarefa/inicia");
        assert_eq!(TaskEndpoint::Scan.path(), "/api/coletor/tarefa/dados");
        assert_eq!(TaskEndpoint::NewBox.path(), "/api/coletor/tarefa/novacaixa");
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(TaskEndpoint::Pause.fallback_error(), "Erro ao pausar");
        assert_eq!(TaskEndpoint::Finish.fallback_error(), "Erro ao encerrar");
        assert_eq!(TaskEndpoint::Cancel.fallback_error(), "Erro ao cancelar");
    }
}
