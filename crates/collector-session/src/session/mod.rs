/*
[INPUT]:  Navigation actions and task-session operations
[OUTPUT]: State machine, task session and their errors
[POS]:    Session domain logic - module wiring
[UPDATE]: When session modules or exports change
*/

pub mod error;
pub mod state_machine;
pub mod task_session;

pub use error::SessionError;
pub use state_machine::{SessionAction, SessionExit, SessionState, SessionStateMachine, StateError};
pub use task_session::{
    AvailableActions, BARCODE_MAX_LEN, ConfirmAction, ConfirmationToken, DismissHandle,
    NEW_BOX_MESSAGE, REFOCUS_DELAY, SCAN_OK_MESSAGE, ScanResult, StartOutcome, TaskSession,
    TerminalOutcome,
};
