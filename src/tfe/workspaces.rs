//! TFE Workspaces
//!
//! Workspace lookups by id and by organization/name, plus create and delete.

use super::client::{segment, TfeClient};
use super::error::Result;
use super::models::{document_data, Workspace};
use serde_json::json;

/// Read a workspace by its id
pub async fn read_workspace_by_id(client: &TfeClient, workspace_id: &str) -> Result<Workspace> {
    let url = client.api_url(&format!("workspaces/{}", segment(workspace_id)));
    let response = client.get(&url).await?;
    Workspace::try_from(document_data(&response, "workspace")?)
}

/// Read a workspace by organization and workspace name
pub async fn read_workspace(
    client: &TfeClient,
    organization: &str,
    name: &str,
) -> Result<Workspace> {
    let url = client.api_url(&format!(
        "organizations/{}/workspaces/{}",
        segment(organization),
        segment(name)
    ));
    let response = client.get(&url).await?;
    Workspace::try_from(document_data(&response, "workspace")?)
}

/// Create a workspace in an organization
pub async fn create_workspace(
    client: &TfeClient,
    organization: &str,
    name: &str,
) -> Result<Workspace> {
    let url = client.api_url(&format!("organizations/{}/workspaces", segment(organization)));
    let body = json!({
        "data": {
            "type": "workspaces",
            "attributes": {
                "name": name,
            }
        }
    });

    tracing::debug!("Create workspace {} in organization {}", name, organization);
    let response = client.post(&url, &body).await?;
    Workspace::try_from(document_data(&response, "workspace")?)
}

/// Delete a workspace by id
pub async fn delete_workspace(client: &TfeClient, workspace_id: &str) -> Result<()> {
    let url = client.api_url(&format!("workspaces/{}", segment(workspace_id)));
    tracing::debug!("Delete workspace {}", workspace_id);
    client.delete(&url).await?;
    Ok(())
}
