/*
[INPUT]:  Error sources (configuration, HTTP, backend replies, serialization)
[OUTPUT]: Structured error types with user-facing messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or changing worker-facing messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Shown when the backend could not be reached
pub const COMMUNICATION_MESSAGE: &str = "Erro de comunicação";

/// Main error type for the collector adapter
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Service URL or tenant not configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Communication(#[from] reqwest::Error),

    /// Non-success HTTP status without a usable body
    #[error("HTTP status {code}")]
    HttpStatus { code: u16 },

    /// Backend answered `Ok: false`
    #[error("{message}")]
    Application { message: String },

    /// Tenant validation reply lacked the validated code
    #[error("Tenant validation failed: {0}")]
    Validation(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Reply was well-formed but missing required data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Coarse classification used at the action boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Communication,
    Application,
}

impl CollectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectorError::Configuration(_)
            | CollectorError::UrlParse(_)
            | CollectorError::Validation(_) => ErrorKind::Configuration,
            CollectorError::Communication(_)
            | CollectorError::HttpStatus { .. }
            | CollectorError::Serialization(_) => ErrorKind::Communication,
            CollectorError::Application { .. } | CollectorError::InvalidResponse(_) => {
                ErrorKind::Application
            }
        }
    }

    /// Text shown to the worker. Backend messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            CollectorError::Application { message } => message.clone(),
            CollectorError::InvalidResponse(message) => message.clone(),
            CollectorError::Configuration(message) => message.clone(),
            CollectorError::Validation(message) => message.clone(),
            CollectorError::UrlParse(_) => "URL de serviços inválida.".to_string(),
            CollectorError::Communication(_)
            | CollectorError::HttpStatus { .. }
            | CollectorError::Serialization(_) => COMMUNICATION_MESSAGE.to_string(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    pub fn missing_service_url() -> Self {
        CollectorError::Configuration("URL de serviços não configurada.".to_string())
    }

    /// Build an application error from an optional backend message
    pub fn application(message: Option<String>, fallback: &str) -> Self {
        let message = message
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        CollectorError::Application { message }
    }

    pub fn http_status(status: StatusCode) -> Self {
        CollectorError::HttpStatus {
            code: status.as_u16(),
        }
    }
}

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            CollectorError::missing_service_url().kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CollectorError::http_status(StatusCode::BAD_GATEWAY).kind(),
            ErrorKind::Communication
        );
        assert_eq!(
            CollectorError::Validation("missing".into()).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_application_message_verbatim() {
        let err = CollectorError::application(Some("Tarefa já pausada".into()), "Erro ao pausar");
        assert_eq!(err.user_message(), "Tarefa já pausada");
    }

    #[test]
    fn test_application_message_fallback() {
        let err = CollectorError::application(None, "Erro ao pausar");
        assert_eq!(err.user_message(), "Erro ao pausar");

        let blank = CollectorError::application(Some("  ".into()), "Erro ao cancelar");
        assert_eq!(blank.user_message(), "Erro ao cancelar");
    }

    #[test]
    fn test_communication_message_hides_details() {
        let err = CollectorError::http_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), COMMUNICATION_MESSAGE);
    }
}
