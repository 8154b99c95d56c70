//! Remote client contract
//!
//! The operations the resource adapters need from the service. `TfeClient`
//! is the real implementation; tests substitute in-memory fakes.

use super::client::TfeClient;
use super::error::Result;
use super::models::{RunTask, Workspace, WorkspaceRunTask};
use super::workspace_run_tasks::{WorkspaceRunTaskCreateOptions, WorkspaceRunTaskUpdateOptions};
use super::{run_tasks, workspace_run_tasks, workspaces};
use async_trait::async_trait;

#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn read_run_task(&self, task_id: &str) -> Result<RunTask>;

    async fn list_run_tasks(&self, organization: &str) -> Result<Vec<RunTask>>;

    async fn read_workspace_by_id(&self, workspace_id: &str) -> Result<Workspace>;

    async fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace>;

    async fn create_workspace_run_task(
        &self,
        workspace_id: &str,
        options: &WorkspaceRunTaskCreateOptions,
    ) -> Result<WorkspaceRunTask>;

    async fn read_workspace_run_task(&self, workspace_id: &str, id: &str)
        -> Result<WorkspaceRunTask>;

    async fn update_workspace_run_task(
        &self,
        workspace_id: &str,
        id: &str,
        options: &WorkspaceRunTaskUpdateOptions,
    ) -> Result<WorkspaceRunTask>;

    async fn delete_workspace_run_task(&self, workspace_id: &str, id: &str) -> Result<()>;

    async fn list_workspace_run_tasks(&self, workspace_id: &str) -> Result<Vec<WorkspaceRunTask>>;
}

#[async_trait]
impl RemoteClient for TfeClient {
    async fn read_run_task(&self, task_id: &str) -> Result<RunTask> {
        run_tasks::read_run_task(self, task_id).await
    }

    async fn list_run_tasks(&self, organization: &str) -> Result<Vec<RunTask>> {
        run_tasks::list_run_tasks(self, organization).await
    }

    async fn read_workspace_by_id(&self, workspace_id: &str) -> Result<Workspace> {
        workspaces::read_workspace_by_id(self, workspace_id).await
    }

    async fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace> {
        workspaces::read_workspace(self, organization, name).await
    }

    async fn create_workspace_run_task(
        &self,
        workspace_id: &str,
        options: &WorkspaceRunTaskCreateOptions,
    ) -> Result<WorkspaceRunTask> {
        workspace_run_tasks::create_workspace_run_task(self, workspace_id, options).await
    }

    async fn read_workspace_run_task(
        &self,
        workspace_id: &str,
        id: &str,
    ) -> Result<WorkspaceRunTask> {
        workspace_run_tasks::read_workspace_run_task(self, workspace_id, id).await
    }

    async fn update_workspace_run_task(
        &self,
        workspace_id: &str,
        id: &str,
        options: &WorkspaceRunTaskUpdateOptions,
    ) -> Result<WorkspaceRunTask> {
        workspace_run_tasks::update_workspace_run_task(self, workspace_id, id, options).await
    }

    async fn delete_workspace_run_task(&self, workspace_id: &str, id: &str) -> Result<()> {
        workspace_run_tasks::delete_workspace_run_task(self, workspace_id, id).await
    }

    async fn list_workspace_run_tasks(&self, workspace_id: &str) -> Result<Vec<WorkspaceRunTask>> {
        workspace_run_tasks::list_workspace_run_tasks(self, workspace_id).await
    }
}
