//! TFE API interaction module
//!
//! Client for the Terraform Cloud / Enterprise JSON:API, covering the
//! endpoints needed to manage run task associations and their neighbours.
//!
//! # Module Structure
//!
//! - [`auth`] - Token resolution from Terraform CLI credentials
//! - [`client`] - Main TFE client for making API requests
//! - [`http`] - HTTP utilities and status mapping
//! - [`api`] - The [`RemoteClient`] contract used by resource adapters
//! - [`models`] - Records and enums decoded from API documents
//! - [`organizations`], [`workspaces`], [`run_tasks`],
//!   [`workspace_run_tasks`], [`test_variables`] - Endpoint functions
//!
//! # Example
//!
//! ```ignore
//! use tfe_runtask::tfe::{client::TfeClient, workspace_run_tasks};
//!
//! async fn example() -> Result<(), tfe_runtask::tfe::TfeError> {
//!     let client = TfeClient::new("app.terraform.io", "token", false)?;
//!     let tasks = workspace_run_tasks::list_workspace_run_tasks(&client, "ws-123").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod models;
pub mod organizations;
pub mod run_tasks;
pub mod test_variables;
pub mod workspace_run_tasks;
pub mod workspaces;

pub use api::RemoteClient;
pub use client::TfeClient;
pub use error::TfeError;
