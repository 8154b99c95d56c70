//! Declarative resources
//!
//! Resources translate between host state documents and remote API calls.
//! The host computes a plan from prior state and configuration, then calls
//! the lifecycle methods; resources never persist anything themselves.
//!
//! # Architecture
//!
//! - [`schema`] - Attribute declarations and configuration validation
//! - [`plan`] - Create / update / replace / delete decisions
//! - [`lifecycle`] - Executes a plan against a [`Resource`]
//! - [`state`] - Typed state of `workspace_run_task`
//! - [`workspace_run_task`] - The run task association adapter
//!
//! # Example
//!
//! ```ignore
//! use tfe_runtask::resource::{lifecycle, WorkspaceRunTaskResource};
//!
//! async fn attach(resource: &WorkspaceRunTaskResource, config: &serde_json::Value) {
//!     let change = lifecycle::plan_change(resource, None, Some(config)).unwrap();
//!     let state = lifecycle::apply(resource, None, &change).await.unwrap();
//! }
//! ```

pub mod error;
pub mod lifecycle;
pub mod plan;
pub mod schema;
pub mod state;
pub mod workspace_run_task;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Diagnostic, Operation, ResourceError};
pub use plan::{PlanAction, PlannedChange};
pub use schema::Schema;
pub use state::{model_from_record, WorkspaceRunTaskModel};
pub use workspace_run_task::WorkspaceRunTaskResource;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A declarative resource type
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: Serialize + DeserializeOwned + Send + Sync;

    /// Full type name under a provider, e.g. `tfe_workspace_run_task`
    fn type_name(&self, provider_type_name: &str) -> String;

    fn schema(&self) -> Schema;

    fn model_from_state(&self, state: &Value) -> error::Result<Self::Model> {
        serde_json::from_value(state.clone())
            .map_err(|e| ResourceError::InvalidState(e.to_string()))
    }

    fn state_from_model(&self, model: &Self::Model) -> error::Result<Value> {
        serde_json::to_value(model).map_err(|e| ResourceError::InvalidState(e.to_string()))
    }

    async fn create(&self, plan: &Self::Model) -> error::Result<Self::Model>;

    /// `None` when the object no longer exists remotely
    async fn read(&self, state: &Self::Model) -> error::Result<Option<Self::Model>>;

    async fn update(&self, plan: &Self::Model) -> error::Result<Self::Model>;

    async fn delete(&self, state: &Self::Model) -> error::Result<()>;

    async fn import_state(&self, id: &str) -> error::Result<Self::Model>;
}
