/*
[INPUT]:  Session identity and the optional login entry
[OUTPUT]: Either the active task or the de-duplicated open-task list
[POS]:    Task list layer - decides what the worker sees after login or refocus
[UPDATE]: When routing rules after login change
*/

use std::collections::HashSet;
use std::sync::Arc;

use collector_adapter::{LoginEntry, SessionIdentity, Task, TaskGateway};
use tracing::{debug, info, warn};

/// What the worker lands on
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedView {
    ActiveSession(Task),
    ListOfTasks(Vec<Task>),
}

pub struct TaskListResolver {
    gateway: Arc<dyn TaskGateway>,
}

impl TaskListResolver {
    pub fn new(gateway: Arc<dyn TaskGateway>) -> Self {
        Self { gateway }
    }

    /// Route a login result. An active task wins; anything else re-fetches the list.
    /// When the re-fetch fails, the list that came with the login is shown instead.
    pub async fn resolve(
        &self,
        identity: &SessionIdentity,
        hint: Option<LoginEntry>,
    ) -> collector_adapter::Result<ResolvedView> {
        match hint {
            Some(LoginEntry::ActiveTask(task)) => {
                info!(task_id = task.id, "resuming active task");
                Ok(ResolvedView::ActiveSession(task))
            }
            Some(LoginEntry::OpenTasks(listed)) => match self.refresh(identity).await {
                Ok(view) => Ok(view),
                Err(err) => {
                    warn!(error = %err, listed = listed.len(), "open task refresh failed, using login list");
                    Ok(ResolvedView::ListOfTasks(dedupe_by_id(listed)))
                }
            },
            None => self.refresh(identity).await,
        }
    }

    /// Re-fetch the open tasks; called whenever the list regains focus
    pub async fn refresh(
        &self,
        identity: &SessionIdentity,
    ) -> collector_adapter::Result<ResolvedView> {
        let tasks = self.gateway.get_open_tasks(identity).await?;
        let total = tasks.len();
        let tasks = dedupe_by_id(tasks);
        debug!(total, unique = tasks.len(), "open tasks fetched");
        Ok(ResolvedView::ListOfTasks(tasks))
    }
}

/// Keep the first occurrence of every task id, preserving order
fn dedupe_by_id(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks.into_iter().filter(|task| seen.insert(task.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collector_adapter::CollectorError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ListGateway {
        tasks: Vec<Task>,
        offline: bool,
        fetches: AtomicUsize,
    }

    impl ListGateway {
        fn new(tasks: Vec<Task>) -> Arc<Self> {
            Arc::new(Self {
                tasks,
                offline: false,
                fetches: AtomicUsize::new(0),
            })
        }

        fn offline() -> Arc<Self> {
            Arc::new(Self {
                tasks: Vec::new(),
                offline: true,
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TaskGateway for ListGateway {
        async fn get_open_tasks(&self, _: &SessionIdentity) -> collector_adapter::Result<Vec<Task>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(CollectorError::HttpStatus { code: 503 });
            }
            Ok(self.tasks.clone())
        }

        async fn start_task(&self, _: &SessionIdentity, _: &Task) -> collector_adapter::Result<Task> {
            Err(CollectorError::InvalidResponse("unused".into()))
        }

        async fn submit_scan(
            &self,
            _: &SessionIdentity,
            _: &Task,
            _: Option<&str>,
        ) -> collector_adapter::Result<Task> {
            Err(CollectorError::InvalidResponse("unused".into()))
        }

        async fn pause_task(&self, _: &SessionIdentity, _: &Task) -> collector_adapter::Result<Option<Task>> {
            Ok(None)
        }

        async fn finish_task(&self, _: &SessionIdentity, _: &Task) -> collector_adapter::Result<Option<Task>> {
            Ok(None)
        }

        async fn cancel_task(&self, _: &SessionIdentity, _: &Task) -> collector_adapter::Result<Option<Task>> {
            Ok(None)
        }

        async fn generate_new_box(&self, _: &SessionIdentity, _: &Task) -> collector_adapter::Result<Task> {
            Err(CollectorError::InvalidResponse("unused".into()))
        }
    }

    fn task(id: i64, description: &str) -> Task {
        Task {
            id,
            operation_name: "SEPARAÇÃO".to_string(),
            description: description.to_string(),
            ..Task::default()
        }
    }

    #[tokio::test]
    async fn test_active_hint_skips_fetch() {
        let gateway = ListGateway::new(vec![task(1, "a")]);
        let resolver = TaskListResolver::new(gateway.clone());
        let view = resolver
            .resolve(&SessionIdentity::new("ACME01", 7), Some(LoginEntry::ActiveTask(task(9, "x"))))
            .await
            .expect("resolve");
        assert_eq!(view, ResolvedView::ActiveSession(task(9, "x")));
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_tasks_hint_refetches_and_dedupes() {
        let gateway = ListGateway::new(vec![task(1, "first"), task(2, "b"), task(1, "again")]);
        let resolver = TaskListResolver::new(gateway.clone());
        let view = resolver
            .resolve(&SessionIdentity::new("ACME01", 7), Some(LoginEntry::OpenTasks(Vec::new())))
            .await
            .expect("resolve");
        assert_eq!(view, ResolvedView::ListOfTasks(vec![task(1, "first"), task(2, "b")]));
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_refetch_falls_back_to_login_list() {
        let gateway = ListGateway::offline();
        let resolver = TaskListResolver::new(gateway.clone());
        let identity = SessionIdentity::new("ACME01", 7);
        let listed = vec![task(3, "c"), task(3, "c again"), task(4, "d")];

        let view = resolver
            .resolve(&identity, Some(LoginEntry::OpenTasks(listed)))
            .await
            .expect("resolve");
        assert_eq!(view, ResolvedView::ListOfTasks(vec![task(3, "c"), task(4, "d")]));
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 1);

        let err = resolver.refresh(&identity).await.expect_err("offline");
        assert!(matches!(err, CollectorError::HttpStatus { code: 503 }));
    }

    #[tokio::test]
    async fn test_refresh_always_fetches() {
        let gateway = ListGateway::new(Vec::new());
        let resolver = TaskListResolver::new(gateway.clone());
        let identity = SessionIdentity::new("ACME01", 7);
        resolver.refresh(&identity).await.expect("first");
        let view = resolver.refresh(&identity).await.expect("second");
        assert_eq!(view, ResolvedView::ListOfTasks(Vec::new()));
        assert_eq!(gateway.fetches.load(Ordering::SeqCst), 2);
    }
}
