/*
[INPUT]:  Settings store, HTTP client options, worker credentials and choices
[OUTPUT]: Resolved views, started task sessions, navigation state
[POS]:    Application layer - glues settings, transport, resolver and session
[UPDATE]: When the login/list/execute flow changes
*/

use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Local};
use collector_adapter::{
    ClientConfig, CollectorClient, CollectorError, SessionIdentity, Task, TaskGateway,
    TenantConfig,
};
use tracing::{info, warn};

use crate::resolver::{ResolvedView, TaskListResolver};
use crate::session::{
    SessionAction, SessionError, SessionState, SessionStateMachine, StartOutcome, TaskSession,
};
use crate::settings::SettingsStore;

/// Snapshot for the settings screen
#[derive(Debug, Clone, PartialEq)]
pub struct TenantStatus {
    pub service_url: String,
    pub tenant_input: String,
    pub validated_code: Option<String>,
    /// Last successful validation in this process
    pub last_validated: Option<DateTime<Local>>,
}

/// Text to show the worker for any error coming out of the app
pub fn worker_message(err: &anyhow::Error) -> String {
    if let Some(collector) = err.downcast_ref::<CollectorError>() {
        return collector.user_message();
    }
    if let Some(session) = err.downcast_ref::<SessionError>() {
        return session.user_message();
    }
    err.to_string()
}

pub struct CollectorApp<S: SettingsStore> {
    store: Arc<S>,
    client_config: ClientConfig,
    machine: SessionStateMachine,
    identity: Option<SessionIdentity>,
    client: Option<Arc<CollectorClient>>,
    last_validated: Option<DateTime<Local>>,
}

impl<S: SettingsStore> CollectorApp<S> {
    pub fn new(store: Arc<S>, client_config: ClientConfig) -> Self {
        Self {
            store,
            client_config,
            machine: SessionStateMachine::new(),
            identity: None,
            client: None,
            last_validated: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.state()
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub async fn settings(&self) -> TenantConfig {
        self.store.get_settings().await
    }

    pub async fn tenant_status(&self) -> TenantStatus {
        let settings = self.store.get_settings().await;
        TenantStatus {
            service_url: settings.service_url,
            tenant_input: settings.tenant_input,
            validated_code: settings.validated_tenant_code,
            last_validated: self.last_validated,
        }
    }

    /// Save the service URL and tenant, then validate the tenant against it.
    ///
    /// A failed validation clears the stored code so no call runs against a
    /// tenant that was never confirmed for the new URL.
    pub async fn configure(&mut self, service_url: &str, tenant_input: &str) -> Result<String> {
        self.store
            .save_settings(service_url, tenant_input)
            .await
            .context("save settings")?;
        let settings = self.store.get_settings().await;
        if !settings.has_service_url() {
            return Err(CollectorError::missing_service_url().into());
        }

        let validation = match CollectorClient::with_base_url(
            self.client_config.clone(),
            &settings.service_url,
        ) {
            Ok(client) => {
                client
                    .validate_tenant(&settings.service_url, &settings.tenant_input)
                    .await
            }
            Err(err) => Err(err),
        };
        match validation {
            Ok(code) => {
                self.store
                    .save_validated_tenant_code(&code)
                    .await
                    .context("save validated tenant code")?;
                self.last_validated = Some(Local::now());
                info!(tenant = %settings.tenant_input, code = %code, "tenant configured");
                Ok(code)
            }
            Err(err) => {
                warn!(tenant = %settings.tenant_input, error = %err, "tenant validation failed");
                self.store
                    .save_validated_tenant_code("")
                    .await
                    .context("clear validated tenant code")?;
                Err(err.into())
            }
        }
    }

    /// Log a worker in and resolve where they land
    pub async fn login(&mut self, user_code: &str, password: &str) -> Result<ResolvedView> {
        let settings = self.store.get_settings().await;
        let tenant_code = require_tenant(&settings)?;
        let client = Arc::new(CollectorClient::with_config(self.client_config.clone(), &settings)?);

        let outcome = client
            .login(user_code.trim(), password, &settings.tenant_input)
            .await?;

        let identity = SessionIdentity::new(tenant_code, outcome.user_id);
        let gateway: Arc<dyn TaskGateway> = client.clone();
        let view = TaskListResolver::new(gateway)
            .resolve(&identity, Some(outcome.entry))
            .await?;
        self.store
            .save_user_id(outcome.user_id)
            .await
            .context("save user id")?;

        self.machine = SessionStateMachine::new();
        let action = match view {
            ResolvedView::ActiveSession(_) => SessionAction::ResumeActive,
            ResolvedView::ListOfTasks(_) => SessionAction::SignIn,
        };
        self.machine.transition(action)?;
        self.identity = Some(identity);
        self.client = Some(client);
        Ok(view)
    }

    /// Pick up the identity saved by an earlier login without calling the backend
    pub async fn restore_session(&mut self) -> Result<SessionIdentity> {
        let settings = self.store.get_settings().await;
        let tenant_code = require_tenant(&settings)?;
        if settings.user_id <= 0 {
            bail!("Nenhum usuário logado.");
        }
        let client = CollectorClient::with_config(self.client_config.clone(), &settings)?;
        let identity = SessionIdentity::new(tenant_code, settings.user_id);

        self.machine = SessionStateMachine::new();
        self.machine.transition(SessionAction::SignIn)?;
        self.identity = Some(identity.clone());
        self.client = Some(Arc::new(client));
        Ok(identity)
    }

    /// Re-fetch the open tasks for the list screen
    pub async fn refresh_list(&self) -> Result<Vec<Task>> {
        let (identity, gateway) = self.signed_in()?;
        match TaskListResolver::new(gateway).refresh(identity).await? {
            ResolvedView::ListOfTasks(tasks) => Ok(tasks),
            ResolvedView::ActiveSession(task) => Ok(vec![task]),
        }
    }

    /// Start a task picked from the list. A rejection keeps the worker on the list.
    pub async fn select_task(&mut self, task: &Task) -> Result<StartOutcome> {
        if !self.machine.can_transition(&SessionAction::SelectTask) {
            return Err(anyhow!(crate::session::StateError::InvalidTransition {
                from: self.machine.state(),
                action: SessionAction::SelectTask,
            }));
        }
        let (identity, gateway) = self.signed_in()?;
        let outcome = TaskSession::start(gateway, identity.clone(), task).await?;
        if let StartOutcome::Started(_) = &outcome {
            self.machine.transition(SessionAction::SelectTask)?;
        }
        Ok(outcome)
    }

    /// Open the session for a task the backend already reports as active
    pub fn resume_task(&self, task: Task) -> Result<TaskSession> {
        if self.machine.state() != SessionState::Active {
            return Err(SessionError::NotActive.into());
        }
        let (identity, gateway) = self.signed_in()?;
        Ok(TaskSession::resume(gateway, identity.clone(), task))
    }

    /// Return to the list after the execution screen closes.
    /// Yields the exit confirmation message, if any.
    pub fn leave_session(&mut self, mut session: TaskSession) -> Result<Option<&'static str>> {
        match session.exit() {
            Some(exit) => {
                self.machine.transition(SessionAction::Exit(exit))?;
                Ok(exit.message())
            }
            None => {
                session.dismiss();
                self.machine.transition(SessionAction::Dismiss)?;
                Ok(None)
            }
        }
    }

    /// Notify the backend and drop the local identity. Local sign-out happens
    /// even when the backend call fails.
    pub async fn logout(&mut self) -> Result<()> {
        let identity = self.identity.take();
        let client = self.client.take();
        if self.machine.state() != SessionState::NoSession {
            self.machine.transition(SessionAction::SignOut)?;
        }
        self.store.save_user_id(0).await.context("clear user id")?;

        match (identity, client) {
            (Some(identity), Some(client)) => {
                client.logout(&identity).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn signed_in(&self) -> Result<(&SessionIdentity, Arc<dyn TaskGateway>)> {
        match (&self.identity, &self.client) {
            (Some(identity), Some(client)) => {
                let gateway: Arc<dyn TaskGateway> = client.clone();
                Ok((identity, gateway))
            }
            _ => bail!("Nenhum usuário logado."),
        }
    }
}

fn require_tenant(settings: &TenantConfig) -> Result<String> {
    if !settings.has_service_url() {
        return Err(CollectorError::missing_service_url().into());
    }
    settings
        .validated_tenant_code
        .clone()
        .ok_or_else(|| anyhow!("Tenant não validado. Configure o tenant antes de entrar."))
}
