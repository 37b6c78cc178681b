/*
[INPUT]:  Public API exports for the collector-session crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod app;
pub mod config;
pub mod resolver;
pub mod session;
pub mod settings;

// Re-export main types for convenience
pub use app::{CollectorApp, TenantStatus, worker_message};
pub use config::AppConfig;
pub use resolver::{ResolvedView, TaskListResolver};
pub use session::{
    ConfirmAction, ScanResult, SessionError, SessionExit, SessionState, StartOutcome,
    TaskSession, TerminalOutcome,
};
pub use settings::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
