/*
[INPUT]:  Worker credentials and session identity
[OUTPUT]: Login outcome, open task list, logout acknowledgement
[POS]:    HTTP layer - worker session endpoints
[UPDATE]: When login/logout/task-list routes or bodies change
*/

use reqwest::Method;
use tracing::{info, warn};

use crate::http::{CollectorClient, CollectorError, Result};
use crate::types::{
    AckResponse, LoginEntry, LoginOutcome, LoginRequest, LoginResponse, LogoutRequest,
    OpenTasksResponse, SessionIdentity, Task, TaskActionRequest,
};

const LOGIN_PATH: &str = "/api/coletor/login";
const LOGOUT_PATH: &str = "/api/coletor/logout";
const OPEN_TASKS_PATH: &str = "/api/coletor/TarefasLivresUsuario";

impl CollectorClient {
    /// Authenticate a worker
    ///
    /// POST /api/coletor/login
    /// An active task in the reply takes priority over the open-task list.
    pub async fn login(
        &self,
        user_code: &str,
        password: &str,
        tenant_input: &str,
    ) -> Result<LoginOutcome> {
        let body = LoginRequest {
            tenant_code: tenant_input.to_string(),
            login: user_code.to_string(),
            senha: password.to_string(),
        };

        let builder = self.request(Method::POST, LOGIN_PATH)?.json(&body);
        let reply: LoginResponse = self.send_envelope(builder).await?;

        if !reply.ok {
            warn!(user = user_code, "login rejected");
            return Err(CollectorError::application(
                reply.error_message,
                "Falha no login",
            ));
        }

        let user_id = reply
            .user_id
            .filter(|id| *id > 0)
            .ok_or_else(|| CollectorError::InvalidResponse("IdUsuario ausente".to_string()))?;

        let entry = match reply.active_task {
            Some(task) => LoginEntry::ActiveTask(task),
            None => LoginEntry::OpenTasks(reply.open_tasks.unwrap_or_default()),
        };
        info!(user = user_code, user_id, "login accepted");

        Ok(LoginOutcome { user_id, entry })
    }

    /// Notify the backend that the worker left
    ///
    /// POST /api/coletor/logout
    pub async fn logout(&self, identity: &SessionIdentity) -> Result<()> {
        let body = LogoutRequest {
            tenant_code: identity.tenant_code.clone(),
            id_usuario: identity.user_id,
        };

        let builder = self.request(Method::POST, LOGOUT_PATH)?.json(&body);
        let reply: AckResponse = self.send_envelope(builder).await?;
        if !reply.ok {
            return Err(CollectorError::application(
                reply.error_message,
                "Erro ao sair",
            ));
        }
        info!(user_id = identity.user_id, "logout acknowledged");
        Ok(())
    }

    /// Open tasks available to the worker
    ///
    /// POST /api/coletor/TarefasLivresUsuario
    pub async fn get_open_tasks(&self, identity: &SessionIdentity) -> Result<Vec<Task>> {
        let body = TaskActionRequest {
            tenant_code: identity.tenant_code.clone(),
            id_tarefa: 0,
            id_usuario: identity.user_id,
            nome_operacao: None,
            codigo_barras: None,
        };

        let builder = self.request(Method::POST, OPEN_TASKS_PATH)?.json(&body);
        let reply: OpenTasksResponse = self.send_envelope(builder).await?;
        if !reply.ok {
            return Err(CollectorError::application(
                reply.error_message,
                "Erro ao carregar tarefas",
            ));
        }
        Ok(reply.tasks)
    }
}
