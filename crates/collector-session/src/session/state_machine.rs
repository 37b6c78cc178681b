/*
[INPUT]:  SessionState and SessionAction
[OUTPUT]: Validated navigation transitions for the collector workflow
[POS]:    Session domain logic - NoSession / Listing / Active lifecycle
[UPDATE]: When screens or their transitions change
*/

use thiserror::Error;

/// Where the worker currently is in the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Listing,
    Active,
}

/// Transient outcome of a terminal action; always lands back on the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    Paused,
    Finished,
    Cancelled,
}

impl SessionExit {
    /// Confirmation shown to the worker after the exit
    pub fn message(self) -> Option<&'static str> {
        match self {
            SessionExit::Paused => None,
            SessionExit::Finished => Some("Tarefa encerrada com sucesso."),
            SessionExit::Cancelled => Some("Tarefa cancelada com sucesso."),
        }
    }
}

/// Actions that can trigger session state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Login succeeded without an active task
    SignIn,
    /// Login or resolver found a task already running for the worker
    ResumeActive,
    /// Start call accepted
    SelectTask,
    Exit(SessionExit),
    /// Execution screen left without a terminal call
    Dismiss,
    SignOut,
}

/// Errors occurring during state transitions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Invalid transition: {from:?} -> {action:?}")]
    InvalidTransition {
        from: SessionState,
        action: SessionAction,
    },
}

/// State machine managing the navigation lifecycle
#[derive(Debug)]
pub struct SessionStateMachine {
    current_state: SessionState,
    last_exit: Option<SessionExit>,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: SessionState::NoSession,
            last_exit: None,
        }
    }

    /// Check if the given action is valid from the current state
    pub fn can_transition(&self, action: &SessionAction) -> bool {
        matches!(
            (self.current_state, action),
            (SessionState::NoSession, SessionAction::SignIn)
                | (SessionState::NoSession, SessionAction::ResumeActive)
                | (SessionState::Listing, SessionAction::SelectTask)
                | (SessionState::Listing, SessionAction::ResumeActive)
                | (SessionState::Active, SessionAction::Exit(_))
                | (SessionState::Active, SessionAction::Dismiss)
                | (SessionState::Listing, SessionAction::SignOut)
                | (SessionState::Active, SessionAction::SignOut)
        )
    }

    /// Perform a state transition
    pub fn transition(&mut self, action: SessionAction) -> Result<SessionState, StateError> {
        if !self.can_transition(&action) {
            return Err(StateError::InvalidTransition {
                from: self.current_state,
                action,
            });
        }

        let next_state = match action {
            SessionAction::SignIn => SessionState::Listing,
            SessionAction::ResumeActive | SessionAction::SelectTask => SessionState::Active,
            SessionAction::Exit(_) | SessionAction::Dismiss => SessionState::Listing,
            SessionAction::SignOut => SessionState::NoSession,
        };

        self.last_exit = match action {
            SessionAction::Exit(exit) => Some(exit),
            _ => None,
        };
        self.current_state = next_state;
        Ok(next_state)
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.current_state
    }

    /// Exit that produced the current Listing state, if any
    pub fn last_exit(&self) -> Option<SessionExit> {
        self.last_exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = SessionStateMachine::new();
        assert_eq!(machine.state(), SessionState::NoSession);
        assert_eq!(machine.last_exit(), None);
    }

    #[test]
    fn test_valid_transitions() {
        let mut machine = SessionStateMachine::new();
        assert_eq!(machine.transition(SessionAction::SignIn), Ok(SessionState::Listing));
        assert_eq!(machine.transition(SessionAction::SelectTask), Ok(SessionState::Active));
        assert_eq!(
            machine.transition(SessionAction::Exit(SessionExit::Paused)),
            Ok(SessionState::Listing)
        );
        assert_eq!(machine.last_exit(), Some(SessionExit::Paused));
        assert_eq!(machine.transition(SessionAction::SelectTask), Ok(SessionState::Active));
        assert_eq!(machine.last_exit(), None);
        assert_eq!(machine.transition(SessionAction::SignOut), Ok(SessionState::NoSession));
    }

    #[test]
    fn test_login_with_active_task_skips_listing() {
        let mut machine = SessionStateMachine::new();
        assert_eq!(machine.transition(SessionAction::ResumeActive), Ok(SessionState::Active));
    }

    #[test]
    fn test_every_exit_returns_to_listing() {
        for exit in [SessionExit::Paused, SessionExit::Finished, SessionExit::Cancelled] {
            let mut machine = SessionStateMachine::new();
            machine.transition(SessionAction::SignIn).expect("sign in");
            machine.transition(SessionAction::SelectTask).expect("select");
            assert_eq!(
                machine.transition(SessionAction::Exit(exit)),
                Ok(SessionState::Listing)
            );
        }
    }

    #[test]
    fn test_invalid_transition() {
        let mut machine = SessionStateMachine::new();
        let result = machine.transition(SessionAction::SelectTask);
        assert_eq!(
            result,
            Err(StateError::InvalidTransition {
                from: SessionState::NoSession,
                action: SessionAction::SelectTask,
            })
        );
        assert_eq!(machine.state(), SessionState::NoSession);
    }

    #[test]
    fn test_exit_requires_active() {
        let mut machine = SessionStateMachine::new();
        machine.transition(SessionAction::SignIn).expect("sign in");
        assert!(!machine.can_transition(&SessionAction::Exit(SessionExit::Finished)));
        assert!(!machine.can_transition(&SessionAction::Dismiss));
    }
}
