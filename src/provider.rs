//! Provider
//!
//! Holds the configured client and hands it to each resource. The client is
//! set once at construction and shared read-only by every resource.

use crate::resource::workspace_run_task::{workspace_run_task_schema, TYPE_NAME_SUFFIX};
use crate::resource::{Resource, Schema, WorkspaceRunTaskResource};
use crate::tfe::api::RemoteClient;
use crate::tfe::client::TfeClient;
use crate::tfe::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Type name prefix of every resource
pub const PROVIDER_TYPE_NAME: &str = "tfe";

/// Connection settings resolved by the host
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub hostname: String,
    pub token: String,
    pub ssl_skip_verify: bool,
}

#[derive(Clone)]
pub struct Provider {
    client: Arc<dyn RemoteClient>,
}

impl Provider {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// Build a provider backed by a real TFE client
    pub fn configure(config: &ProviderConfig) -> Result<Self> {
        let client = TfeClient::new(&config.hostname, &config.token, config.ssl_skip_verify)?;
        tracing::info!("Provider configured for {}", client.address());
        Ok(Self::new(Arc::new(client)))
    }

    pub fn workspace_run_task(&self) -> WorkspaceRunTaskResource {
        WorkspaceRunTaskResource::new(self.client.clone())
    }

    /// Type names of every resource this provider serves
    pub fn resource_type_names(&self) -> Vec<String> {
        vec![self.workspace_run_task().type_name(PROVIDER_TYPE_NAME)]
    }

    /// Schemas keyed by resource type name; needs no client
    pub fn resource_schemas() -> BTreeMap<String, Schema> {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            format!("{}{}", PROVIDER_TYPE_NAME, TYPE_NAME_SUFFIX),
            workspace_run_task_schema(),
        );
        schemas
    }
}
