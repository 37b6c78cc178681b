/*
[INPUT]:  Session-level intents (list, start, scan, terminal actions)
[OUTPUT]: Trait object boundary between the session engine and HTTP
[POS]:    HTTP layer - seam consumed by the session crate
[UPDATE]: When the session engine needs a new backend operation
*/

use async_trait::async_trait;

use crate::http::{CollectorClient, Result};
use crate::types::{SessionIdentity, Task};

/// Backend operations used by the task-session workflow
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn get_open_tasks(&self, identity: &SessionIdentity) -> Result<Vec<Task>>;

    async fn start_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Task>;

    async fn submit_scan(
        &self,
        identity: &SessionIdentity,
        task: &Task,
        barcode: Option<&str>,
    ) -> Result<Task>;

    async fn pause_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>>;

    async fn finish_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>>;

    async fn cancel_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>>;

    async fn generate_new_box(&self, identity: &SessionIdentity, task: &Task) -> Result<Task>;
}

#[async_trait]
impl TaskGateway for CollectorClient {
    async fn get_open_tasks(&self, identity: &SessionIdentity) -> Result<Vec<Task>> {
        CollectorClient::get_open_tasks(self, identity).await
    }

    async fn start_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Task> {
        CollectorClient::start_task(self, identity, task.id, &task.operation_name).await
    }

    async fn submit_scan(
        &self,
        identity: &SessionIdentity,
        task: &Task,
        barcode: Option<&str>,
    ) -> Result<Task> {
        CollectorClient::submit_scan(self, identity, task.id, &task.operation_name, barcode).await
    }

    async fn pause_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>> {
        CollectorClient::pause_task(self, identity, task.id, &task.operation_name).await
    }

    async fn finish_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>> {
        CollectorClient::finish_task(self, identity, task.id, &task.operation_name).await
    }

    async fn cancel_task(&self, identity: &SessionIdentity, task: &Task) -> Result<Option<Task>> {
        CollectorClient::cancel_task(self, identity, task.id, &task.operation_name).await
    }

    async fn generate_new_box(&self, identity: &SessionIdentity, task: &Task) -> Result<Task> {
        CollectorClient::generate_new_box(self, identity, task.id, &task.operation_name).await
    }
}
