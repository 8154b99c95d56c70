//! TFE Workspace Run Tasks
//!
//! Associations attaching an organization run task to a workspace.

use super::client::{segment, TfeClient};
use super::error::Result;
use super::models::{document_data, EnforcementLevel, Stage, WorkspaceRunTask};
use serde_json::{json, Map, Value};

/// Options for attaching a run task to a workspace
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceRunTaskCreateOptions {
    pub run_task_id: String,
    pub enforcement_level: EnforcementLevel,
    /// Left to the service default when `None`
    pub stage: Option<Stage>,
}

impl WorkspaceRunTaskCreateOptions {
    pub(crate) fn to_body(&self) -> Value {
        json!({
            "data": {
                "type": "workspace-tasks",
                "attributes": attributes(self.enforcement_level, self.stage),
                "relationships": {
                    "task": {
                        "data": {"id": self.run_task_id, "type": "tasks"}
                    }
                }
            }
        })
    }
}

/// Options for updating an association
///
/// The task and workspace of an association cannot change.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceRunTaskUpdateOptions {
    pub enforcement_level: EnforcementLevel,
    /// Omitted from the request when `None`
    pub stage: Option<Stage>,
}

impl WorkspaceRunTaskUpdateOptions {
    pub(crate) fn to_body(&self) -> Value {
        json!({
            "data": {
                "type": "workspace-tasks",
                "attributes": attributes(self.enforcement_level, self.stage),
            }
        })
    }
}

fn attributes(level: EnforcementLevel, stage: Option<Stage>) -> Value {
    let mut map = Map::new();
    map.insert("enforcement-level".to_string(), json!(level.as_str()));
    if let Some(stage) = stage {
        map.insert("stage".to_string(), json!(stage.as_str()));
    }
    Value::Object(map)
}

fn tasks_url(client: &TfeClient, workspace_id: &str) -> String {
    client.api_url(&format!("workspaces/{}/tasks", segment(workspace_id)))
}

fn task_url(client: &TfeClient, workspace_id: &str, id: &str) -> String {
    client.api_url(&format!(
        "workspaces/{}/tasks/{}",
        segment(workspace_id),
        segment(id)
    ))
}

/// Attach a run task to a workspace
pub async fn create_workspace_run_task(
    client: &TfeClient,
    workspace_id: &str,
    options: &WorkspaceRunTaskCreateOptions,
) -> Result<WorkspaceRunTask> {
    let url = tasks_url(client, workspace_id);
    let response = client.post(&url, &options.to_body()).await?;
    WorkspaceRunTask::try_from(document_data(&response, "workspace run task")?)
}

/// Read an association by workspace and id
pub async fn read_workspace_run_task(
    client: &TfeClient,
    workspace_id: &str,
    id: &str,
) -> Result<WorkspaceRunTask> {
    let url = task_url(client, workspace_id, id);
    let response = client.get(&url).await?;
    WorkspaceRunTask::try_from(document_data(&response, "workspace run task")?)
}

/// Update the enforcement level and stage of an association
pub async fn update_workspace_run_task(
    client: &TfeClient,
    workspace_id: &str,
    id: &str,
    options: &WorkspaceRunTaskUpdateOptions,
) -> Result<WorkspaceRunTask> {
    let url = task_url(client, workspace_id, id);
    let response = client.patch(&url, &options.to_body()).await?;
    WorkspaceRunTask::try_from(document_data(&response, "workspace run task")?)
}

/// Detach a run task from a workspace
pub async fn delete_workspace_run_task(
    client: &TfeClient,
    workspace_id: &str,
    id: &str,
) -> Result<()> {
    let url = task_url(client, workspace_id, id);
    client.delete(&url).await?;
    Ok(())
}

/// List every association of a workspace
pub async fn list_workspace_run_tasks(
    client: &TfeClient,
    workspace_id: &str,
) -> Result<Vec<WorkspaceRunTask>> {
    let url = tasks_url(client, workspace_id);
    client
        .get_all(&url)
        .await?
        .iter()
        .map(WorkspaceRunTask::try_from)
        .collect()
}
