/*
[INPUT]:  TaskGateway, session identity, the task mirror and worker actions
[OUTPUT]: Scan results, terminal outcomes, confirmation tokens
[POS]:    Session domain logic - the Active screen's owner of the task mirror
[UPDATE]: When scan protocol, terminal actions or their guards change
*/

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use collector_adapter::{OperationKind, SessionIdentity, Task, TaskGateway};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::SessionError;
use super::state_machine::SessionExit;

pub const SCAN_OK_MESSAGE: &str = "LEITURA OK";
pub const NEW_BOX_MESSAGE: &str = "NOVA CAIXA GERADA";
/// Scanner input field length (EAN-13)
pub const BARCODE_MAX_LEN: usize = 13;
/// Delay before the barcode input is focused again after a response
pub const REFOCUS_DELAY: Duration = Duration::from_millis(100);

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Message area content after a scan or new-box attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub success: bool,
    pub message: String,
}

impl ScanResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Result of pause / finish / cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// Session ended; the caller goes back to the list
    Exited(SessionExit),
    /// Backend refused or was unreachable; the session stays active
    Stayed(ScanResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    Finish,
    Cancel,
}

/// Single-use proof that the worker confirmed a finish/cancel prompt
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmationToken {
    session_id: u64,
    task_id: i64,
    action: ConfirmAction,
}

impl ConfirmationToken {
    pub fn action(&self) -> ConfirmAction {
        self.action
    }

    pub fn task_id(&self) -> i64 {
        self.task_id
    }

    pub fn title(&self) -> &'static str {
        match self.action {
            ConfirmAction::Finish => "Confirmar Encerramento",
            ConfirmAction::Cancel => "Confirmar Cancelamento",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self.action {
            ConfirmAction::Finish => "Deseja realmente encerrar esta tarefa?",
            ConfirmAction::Cancel => "Deseja realmente cancelar esta tarefa?",
        }
    }
}

/// Which footer actions the current task exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailableActions {
    pub finish: bool,
    pub cancel: bool,
    pub new_box: bool,
}

/// Cloneable handle the screen uses to dismiss a session from outside
#[derive(Debug, Clone)]
pub struct DismissHandle(CancellationToken);

impl DismissHandle {
    pub fn dismiss(&self) {
        self.0.cancel();
    }

    pub fn is_dismissed(&self) -> bool {
        self.0.is_cancelled()
    }
}

/// Outcome of selecting a task from the list
#[derive(Debug)]
pub enum StartOutcome {
    Started(TaskSession),
    /// Start refused; the worker stays on the list
    Rejected { message: String },
}

/// Applies the reply of a call whose caller stopped waiting; false when no reply was stored
type Unsettled = Box<dyn FnOnce(&mut TaskSession) -> bool + Send + Sync>;

/// Active task session: owns the task mirror, barcode buffer and message area.
///
/// Mutating calls run on a spawned task that holds the in-flight guard, so an
/// abandoned call still finishes on the backend and keeps later calls out
/// until it does. Its reply is applied by [`settle`](Self::settle), which every
/// action runs first. Responses that arrive after dismissal are discarded.
pub struct TaskSession {
    id: u64,
    gateway: Arc<dyn TaskGateway>,
    identity: SessionIdentity,
    task: Option<Task>,
    exit: Option<SessionExit>,
    barcode: String,
    message: Option<ScanResult>,
    in_flight: Arc<Mutex<()>>,
    unsettled: Option<Unsettled>,
    dismissed: CancellationToken,
}

impl fmt::Debug for TaskSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSession")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("task", &self.task)
            .field("exit", &self.exit)
            .field("barcode", &self.barcode)
            .field("message", &self.message)
            .field("unsettled", &self.unsettled.is_some())
            .field("dismissed", &self.dismissed.is_cancelled())
            .finish()
    }
}

impl TaskSession {
    /// Start a task picked from the list
    pub async fn start(
        gateway: Arc<dyn TaskGateway>,
        identity: SessionIdentity,
        task: &Task,
    ) -> Result<StartOutcome, SessionError> {
        if !task.status.is_selectable() {
            return Err(SessionError::TaskNotSelectable {
                task_id: task.id,
                status: task.status.clone(),
            });
        }

        info!(task_id = task.id, operation = %task.operation_name, "starting task");
        match gateway.start_task(&identity, task).await {
            Ok(mirror) => Ok(StartOutcome::Started(Self::resume(gateway, identity, mirror))),
            Err(err) => {
                warn!(task_id = task.id, error = %err, "start rejected");
                Ok(StartOutcome::Rejected {
                    message: err.user_message(),
                })
            }
        }
    }

    /// Enter a task the backend already reports as active for the worker
    pub fn resume(gateway: Arc<dyn TaskGateway>, identity: SessionIdentity, task: Task) -> Self {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, task_id = task.id, "task session opened");
        Self {
            id,
            gateway,
            identity,
            task: Some(task),
            exit: None,
            barcode: String::new(),
            message: None,
            in_flight: Arc::new(Mutex::new(())),
            unsettled: None,
            dismissed: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Current mirror; `None` once the session ended
    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn operation_kind(&self) -> Option<OperationKind> {
        self.task.as_ref().map(Task::operation_kind)
    }

    pub fn exit(&self) -> Option<SessionExit> {
        self.exit
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some() && !self.dismissed.is_cancelled()
    }

    /// A mutating call is still running
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// Replace the barcode buffer with the trimmed input, capped at the scanner field length
    pub fn set_barcode(&mut self, input: &str) {
        self.barcode = input.trim().chars().take(BARCODE_MAX_LEN).collect();
    }

    pub fn message(&self) -> Option<&ScanResult> {
        self.message.as_ref()
    }

    pub fn available_actions(&self) -> AvailableActions {
        match self.operation_kind() {
            Some(kind) if self.is_active() => AvailableActions {
                finish: kind.allows_finish(),
                cancel: kind.allows_cancel(),
                new_box: kind.allows_new_box(),
            },
            _ => AvailableActions::default(),
        }
    }

    pub fn dismiss_handle(&self) -> DismissHandle {
        DismissHandle(self.dismissed.clone())
    }

    /// Leave the execution screen without a terminal call
    pub fn dismiss(&mut self) {
        self.dismissed.cancel();
        self.discard(None);
    }

    /// Run `on_refocus` after [`REFOCUS_DELAY`] unless the session is dismissed first.
    /// Resolves to whether the callback ran.
    pub fn schedule_refocus<F>(&self, on_refocus: F) -> JoinHandle<bool>
    where
        F: FnOnce() + Send + 'static,
    {
        let dismissed = self.dismissed.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = dismissed.cancelled() => false,
                _ = tokio::time::sleep(REFOCUS_DELAY) => {
                    on_refocus();
                    true
                }
            }
        })
    }

    /// Apply the reply of an abandoned call once it has arrived.
    /// Returns whether the mirror, message area or buffer changed.
    pub fn settle(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(apply) = self.unsettled.take() else {
            return false;
        };
        if self.dismissed.is_cancelled() {
            debug!(session = self.id, "dropping late response for dismissed session");
            return false;
        }
        debug!(session = self.id, "applying late response");
        apply(self)
    }

    /// Set the buffer and submit it
    pub async fn scan(&mut self, barcode: &str) -> Result<ScanResult, SessionError> {
        self.settle();
        self.active_task()?;
        self.set_barcode(barcode);
        self.submit_scan().await
    }

    /// Submit the barcode buffer. The buffer is cleared whatever the outcome.
    pub async fn submit_scan(&mut self) -> Result<ScanResult, SessionError> {
        self.settle();
        self.active_task()?;
        let barcode = self.barcode.trim().to_string();
        if barcode.is_empty() {
            return Err(SessionError::EmptyBarcode);
        }
        if self.is_busy() {
            return Err(SessionError::Busy);
        }

        self.message = None;
        self.dispatch(
            move |gateway, identity, task| async move {
                gateway.submit_scan(&identity, &task, Some(barcode.as_str())).await
            },
            Self::land_scan,
        )
        .await
    }

    /// Open a new box (packing only)
    pub async fn new_box(&mut self) -> Result<ScanResult, SessionError> {
        self.settle();
        let task = self.active_task()?;
        let kind = task.operation_kind();
        if !kind.allows_new_box() {
            return Err(SessionError::ActionUnavailable {
                action: "new box",
                operation: task.operation_name.clone(),
            });
        }

        self.dispatch(
            |gateway, identity, task| async move { gateway.generate_new_box(&identity, &task).await },
            Self::land_new_box,
        )
        .await
    }

    pub async fn pause(&mut self) -> Result<TerminalOutcome, SessionError> {
        self.settle();
        self.active_task()?;
        self.terminal(SessionExit::Paused).await
    }

    /// First half of the finish protocol: returns the token the confirmation answers with
    pub fn request_finish(&self) -> Result<ConfirmationToken, SessionError> {
        self.request_confirmation(ConfirmAction::Finish)
    }

    pub async fn confirm_finish(
        &mut self,
        token: ConfirmationToken,
    ) -> Result<TerminalOutcome, SessionError> {
        self.settle();
        self.check_token(&token, ConfirmAction::Finish)?;
        self.terminal(SessionExit::Finished).await
    }

    pub fn request_cancel(&self) -> Result<ConfirmationToken, SessionError> {
        self.request_confirmation(ConfirmAction::Cancel)
    }

    pub async fn confirm_cancel(
        &mut self,
        token: ConfirmationToken,
    ) -> Result<TerminalOutcome, SessionError> {
        self.settle();
        self.check_token(&token, ConfirmAction::Cancel)?;
        self.terminal(SessionExit::Cancelled).await
    }

    fn request_confirmation(&self, action: ConfirmAction) -> Result<ConfirmationToken, SessionError> {
        let task = self.active_task()?;
        let kind = task.operation_kind();
        let allowed = match action {
            ConfirmAction::Finish => kind.allows_finish(),
            ConfirmAction::Cancel => kind.allows_cancel(),
        };
        if !allowed {
            return Err(SessionError::ActionUnavailable {
                action: match action {
                    ConfirmAction::Finish => "finish",
                    ConfirmAction::Cancel => "cancel",
                },
                operation: task.operation_name.clone(),
            });
        }

        Ok(ConfirmationToken {
            session_id: self.id,
            task_id: task.id,
            action,
        })
    }

    fn check_token(&self, token: &ConfirmationToken, action: ConfirmAction) -> Result<(), SessionError> {
        let task = self.active_task()?;
        if token.session_id != self.id || token.task_id != task.id || token.action != action {
            return Err(SessionError::TokenMismatch);
        }
        Ok(())
    }

    async fn terminal(&mut self, exit: SessionExit) -> Result<TerminalOutcome, SessionError> {
        self.dispatch(
            move |gateway, identity, task| async move {
                match exit {
                    SessionExit::Paused => gateway.pause_task(&identity, &task).await,
                    SessionExit::Finished => gateway.finish_task(&identity, &task).await,
                    SessionExit::Cancelled => gateway.cancel_task(&identity, &task).await,
                }
            },
            move |session, reply| session.land_terminal(exit, reply),
        )
        .await
    }

    fn land_scan(&mut self, reply: collector_adapter::Result<Task>) -> ScanResult {
        let result = match reply {
            Ok(mirror) => {
                debug!(session = self.id, task_id = mirror.id, "scan accepted");
                self.task = Some(mirror);
                ScanResult::ok(SCAN_OK_MESSAGE)
            }
            Err(err) => {
                warn!(session = self.id, error = %err, "scan failed");
                ScanResult::failed(err.user_message())
            }
        };

        self.barcode.clear();
        self.message = Some(result.clone());
        result
    }

    fn land_new_box(&mut self, reply: collector_adapter::Result<Task>) -> ScanResult {
        let result = match reply {
            Ok(mirror) => {
                info!(session = self.id, task_id = mirror.id, "new box generated");
                self.task = Some(mirror);
                ScanResult::ok(NEW_BOX_MESSAGE)
            }
            Err(err) => {
                warn!(session = self.id, error = %err, "new box failed");
                ScanResult::failed(err.user_message())
            }
        };
        self.message = Some(result.clone());
        result
    }

    fn land_terminal(
        &mut self,
        exit: SessionExit,
        reply: collector_adapter::Result<Option<Task>>,
    ) -> TerminalOutcome {
        match reply {
            Ok(_) => {
                info!(session = self.id, ?exit, "task session ended");
                self.discard(Some(exit));
                TerminalOutcome::Exited(exit)
            }
            Err(err) => {
                warn!(session = self.id, ?exit, error = %err, "terminal action failed");
                let result = ScanResult::failed(err.user_message());
                self.message = Some(result.clone());
                TerminalOutcome::Stayed(result)
            }
        }
    }

    fn active_task(&self) -> Result<&Task, SessionError> {
        if self.dismissed.is_cancelled() {
            return Err(SessionError::Dismissed);
        }
        self.task.as_ref().ok_or(SessionError::NotActive)
    }

    /// Drop the mirror and barcode buffer
    fn discard(&mut self, exit: Option<SessionExit>) {
        self.task = None;
        self.barcode.clear();
        self.exit = exit;
    }

    /// Run one backend call under the in-flight guard and land its reply with `apply`.
    ///
    /// The reply is parked in a slot before the guard is released; if this
    /// future is dropped, the slot stays behind for [`settle`](Self::settle).
    async fn dispatch<T, R, F, Fut, A>(&mut self, call: F, apply: A) -> Result<R, SessionError>
    where
        F: FnOnce(Arc<dyn TaskGateway>, SessionIdentity, Task) -> Fut,
        Fut: Future<Output = collector_adapter::Result<T>> + Send + 'static,
        A: FnOnce(&mut Self, collector_adapter::Result<T>) -> R + Clone + Send + Sync + 'static,
        T: Send + 'static,
    {
        let task = self.active_task()?.clone();
        let guard = Arc::clone(&self.in_flight)
            .try_lock_owned()
            .map_err(|_| SessionError::Busy)?;

        let slot = Arc::new(StdMutex::new(None));
        let request = call(Arc::clone(&self.gateway), self.identity.clone(), task);
        let handle = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move {
                let reply = request.await;
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(reply);
                drop(guard);
            }
        });

        let parked = Arc::clone(&slot);
        let late_apply = apply.clone();
        self.unsettled = Some(Box::new(move |session: &mut Self| {
            let reply = parked.lock().unwrap_or_else(PoisonError::into_inner).take();
            match reply {
                Some(reply) => {
                    late_apply(session, reply);
                    true
                }
                None => false,
            }
        }));

        let joined = handle.await;
        self.unsettled = None;
        joined.map_err(|err| SessionError::Aborted(err.to_string()))?;

        if self.dismissed.is_cancelled() {
            debug!(session = self.id, "discarding response for dismissed session");
            self.discard(None);
            return Err(SessionError::Dismissed);
        }
        let reply = slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| SessionError::Aborted("request finished without a reply".to_string()))?;
        Ok(apply(self, reply))
    }
}
