//! TFE Organizations
//!
//! Functions for reading, creating and deleting organizations.

use super::client::{segment, TfeClient};
use super::error::Result;
use super::models::{document_data, Organization};
use serde_json::json;

/// Read an organization by name
pub async fn read_organization(client: &TfeClient, name: &str) -> Result<Organization> {
    let url = client.api_url(&format!("organizations/{}", segment(name)));
    let response = client.get(&url).await?;
    Organization::try_from(document_data(&response, "organization")?)
}

/// Create an organization
pub async fn create_organization(
    client: &TfeClient,
    name: &str,
    email: &str,
) -> Result<Organization> {
    let url = client.api_url("organizations");
    let body = json!({
        "data": {
            "type": "organizations",
            "attributes": {
                "name": name,
                "email": email,
            }
        }
    });

    tracing::debug!("Create organization {}", name);
    let response = client.post(&url, &body).await?;
    Organization::try_from(document_data(&response, "organization")?)
}

/// Delete an organization and everything in it
pub async fn delete_organization(client: &TfeClient, name: &str) -> Result<()> {
    let url = client.api_url(&format!("organizations/{}", segment(name)));
    tracing::debug!("Delete organization {}", name);
    client.delete(&url).await?;
    Ok(())
}
