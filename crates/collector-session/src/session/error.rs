/*
[INPUT]:  Session preconditions and state machine failures
[OUTPUT]: SessionError
[POS]:    Session domain logic - precondition errors (transport errors are handled as messages)
[UPDATE]: When new session preconditions are introduced
*/

use collector_adapter::TaskStatus;
use thiserror::Error;

use super::state_machine::StateError;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Session already ended (paused, finished, cancelled)
    #[error("no active task session")]
    NotActive,

    /// Execution screen was dismissed; late responses are dropped
    #[error("task session was dismissed")]
    Dismissed,

    #[error("barcode is empty")]
    EmptyBarcode,

    /// Another mutating call for this session is still in flight
    #[error("another request is still in progress")]
    Busy,

    #[error("{action} is not available for operation {operation}")]
    ActionUnavailable {
        action: &'static str,
        operation: String,
    },

    #[error("task {task_id} cannot be started while {status}")]
    TaskNotSelectable { task_id: i64, status: TaskStatus },

    /// Confirmation token issued for another action or session
    #[error("confirmation token does not match this action")]
    TokenMismatch,

    /// Background request task panicked or was aborted
    #[error("request aborted: {0}")]
    Aborted(String),

    #[error(transparent)]
    State(#[from] StateError),
}

impl SessionError {
    /// Text shown to the worker on the execution screen
    pub fn user_message(&self) -> String {
        match self {
            SessionError::NotActive => "Nenhuma tarefa ativa.".to_string(),
            SessionError::Dismissed => "Tela da tarefa foi fechada.".to_string(),
            SessionError::EmptyBarcode => "Informe o código de barras.".to_string(),
            SessionError::Busy => "Aguarde a resposta da leitura anterior.".to_string(),
            SessionError::ActionUnavailable { action, operation } => {
                let label = match *action {
                    "finish" => "Encerrar",
                    "cancel" => "Cancelar",
                    "new box" => "Nova caixa",
                    other => other,
                };
                format!("{label} não disponível para a operação {operation}.")
            }
            SessionError::TaskNotSelectable { task_id, .. } => {
                format!("Tarefa {task_id} não pode ser iniciada.")
            }
            SessionError::TokenMismatch => "Confirmação inválida para esta ação.".to_string(),
            SessionError::Aborted(_) => "Requisição interrompida. Tente novamente.".to_string(),
            SessionError::State(_) => "Ação não permitida nesta tela.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state_machine::{SessionAction, SessionState};

    #[test]
    fn test_user_message_is_worker_text() {
        assert_eq!(SessionError::Busy.user_message(), "Aguarde a resposta da leitura anterior.");
        assert_eq!(SessionError::EmptyBarcode.user_message(), "Informe o código de barras.");
        assert_eq!(
            SessionError::ActionUnavailable {
                action: "new box",
                operation: "INVENTÁRIO".to_string(),
            }
            .user_message(),
            "Nova caixa não disponível para a operação INVENTÁRIO."
        );
        assert_eq!(
            SessionError::TaskNotSelectable {
                task_id: 12,
                status: TaskStatus::Completed,
            }
            .user_message(),
            "Tarefa 12 não pode ser iniciada."
        );
    }

    #[test]
    fn test_state_error_message_hides_transition_detail() {
        let err = SessionError::from(StateError::InvalidTransition {
            from: SessionState::NoSession,
            action: SessionAction::SelectTask,
        });
        assert!(err.to_string().contains("Invalid transition"));
        assert_eq!(err.user_message(), "Ação não permitida nesta tela.");
    }
}
