/*
[INPUT]:  Backend task schema (operation names, status strings)
[OUTPUT]: Typed Rust enums with lenient parsing
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the backend adds operation kinds or status values
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Task category; decides which terminal actions a session exposes.
///
/// Parsed case-insensitively from the Portuguese wire names, their unaccented
/// spellings and the English names. Anything else is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Inventory,
    Picking,
    Addressing,
    Shipping,
    Packing,
    Other(String),
}

impl OperationKind {
    pub fn parse(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        match upper.as_str() {
            "INVENTÁRIO" | "INVENTARIO" | "INVENTORY" => Self::Inventory,
            "SEPARAÇÃO" | "SEPARACAO" | "PICKING" => Self::Picking,
            "ENDEREÇAMENTO" | "ENDERECAMENTO" | "ADDRESSING" => Self::Addressing,
            "EXPEDIÇÃO" | "EXPEDICAO" | "SHIPPING" => Self::Shipping,
            "EMBALAGEM" | "PACKING" => Self::Packing,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    /// Canonical wire name
    pub fn wire_name(&self) -> &str {
        match self {
            Self::Inventory => "INVENTÁRIO",
            Self::Picking => "SEPARAÇÃO",
            Self::Addressing => "ENDEREÇAMENTO",
            Self::Shipping => "EXPEDIÇÃO",
            Self::Packing => "EMBALAGEM",
            Self::Other(name) => name,
        }
    }

    /// Finish and cancel are only offered for inventory and addressing tasks
    pub fn allows_finish(&self) -> bool {
        matches!(self, Self::Inventory | Self::Addressing)
    }

    pub fn allows_cancel(&self) -> bool {
        self.allows_finish()
    }

    pub fn allows_new_box(&self) -> bool {
        matches!(self, Self::Packing)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Server-reported task status. Never computed locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Paused,
    Completed,
    Cancelled,
    Unknown(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_uppercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "PENDENTE" | "PENDING" | "ABERTA" | "LIVRE" => Self::Pending,
            "EM ANDAMENTO" | "EM EXECUÇÃO" | "EM EXECUCAO" | "INICIADA" | "IN PROGRESS" => {
                Self::InProgress
            }
            "PAUSADA" | "PAUSADO" | "PAUSED" => Self::Paused,
            "ENCERRADA" | "CONCLUÍDA" | "CONCLUIDA" | "FINALIZADA" | "COMPLETED" => {
                Self::Completed
            }
            "CANCELADA" | "CANCELADO" | "CANCELLED" | "CANCELED" => Self::Cancelled,
            _ => Self::Unknown(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDENTE",
            Self::InProgress => "EM ANDAMENTO",
            Self::Paused => "PAUSADA",
            Self::Completed => "ENCERRADA",
            Self::Cancelled => "CANCELADA",
            Self::Unknown(raw) => raw,
        }
    }

    /// A task can be started from the list only while pending or in progress.
    /// Unrecognized statuses are left for the server to judge.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress | Self::Unknown(_))
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TaskStatus> for String {
    fn from(value: TaskStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
