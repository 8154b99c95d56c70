//! TFE Run Tasks
//!
//! Organization-level run task definitions.

use super::client::{segment, TfeClient};
use super::error::Result;
use super::models::{document_data, RunTask};
use serde_json::{json, Value};

/// Options for creating a run task
#[derive(Debug, Clone)]
pub struct RunTaskCreateOptions {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub hmac_key: Option<String>,
}

impl RunTaskCreateOptions {
    fn to_body(&self) -> Value {
        let mut attributes = json!({
            "name": self.name,
            "url": self.url,
            "category": "task",
            "enabled": self.enabled,
        });
        if let Value::Object(ref mut map) = attributes {
            if let Some(ref description) = self.description {
                map.insert("description".to_string(), json!(description));
            }
            if let Some(ref hmac_key) = self.hmac_key {
                map.insert("hmac-key".to_string(), json!(hmac_key));
            }
        }

        json!({
            "data": {
                "type": "tasks",
                "attributes": attributes,
            }
        })
    }
}

/// Read a run task by id
pub async fn read_run_task(client: &TfeClient, task_id: &str) -> Result<RunTask> {
    let url = client.api_url(&format!("tasks/{}", segment(task_id)));
    let response = client.get(&url).await?;
    RunTask::try_from(document_data(&response, "run task")?)
}

/// List every run task in an organization
pub async fn list_run_tasks(client: &TfeClient, organization: &str) -> Result<Vec<RunTask>> {
    let url = client.api_url(&format!("organizations/{}/tasks", segment(organization)));
    client
        .get_all(&url)
        .await?
        .iter()
        .map(RunTask::try_from)
        .collect()
}

/// Create a run task in an organization
pub async fn create_run_task(
    client: &TfeClient,
    organization: &str,
    options: &RunTaskCreateOptions,
) -> Result<RunTask> {
    let url = client.api_url(&format!("organizations/{}/tasks", segment(organization)));
    tracing::debug!("Create run task {} in organization {}", options.name, organization);
    let response = client.post(&url, &options.to_body()).await?;
    RunTask::try_from(document_data(&response, "run task")?)
}

/// Delete a run task by id
pub async fn delete_run_task(client: &TfeClient, task_id: &str) -> Result<()> {
    let url = client.api_url(&format!("tasks/{}", segment(task_id)));
    tracing::debug!("Delete run task {}", task_id);
    client.delete(&url).await?;
    Ok(())
}
