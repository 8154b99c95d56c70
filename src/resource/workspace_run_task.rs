//! `workspace_run_task` resource
//!
//! Attaches an organization run task to a workspace. The association's
//! workspace and task are fixed at creation; enforcement level and stage can
//! be changed in place.

use super::error::{Operation, ResourceError, Result};
use super::schema::{sentence_list, Schema, StringAttribute};
use super::state::{model_from_record, WorkspaceRunTaskModel};
use super::Resource;
use crate::tfe::api::RemoteClient;
use crate::tfe::models::{EnforcementLevel, Stage};
use crate::tfe::workspace_run_tasks::{
    WorkspaceRunTaskCreateOptions, WorkspaceRunTaskUpdateOptions,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Type name suffix appended to the provider's type name
pub const TYPE_NAME_SUFFIX: &str = "_workspace_run_task";

/// Schema for `workspace_run_task`
pub fn workspace_run_task_schema() -> Schema {
    Schema::new(0)
        .attribute(
            "id",
            StringAttribute::computed("Service-generated identifier for the workspace task")
                .use_state_for_unknown(),
        )
        .attribute(
            "workspace_id",
            StringAttribute::required("The id of the workspace to associate the Run task to.")
                .requires_replace(),
        )
        .attribute(
            "task_id",
            StringAttribute::required("The id of the Run task to associate to the Workspace.")
                .requires_replace(),
        )
        .attribute(
            "enforcement_level",
            StringAttribute::required(format!(
                "The enforcement level of the task. Valid values are {}.",
                sentence_list(EnforcementLevel::VALUES, "`", "`", "and")
            ))
            .one_of(EnforcementLevel::VALUES),
        )
        .attribute(
            "stage",
            StringAttribute::optional_computed(format!(
                "The stage to run the task in. Valid values are {}.",
                sentence_list(Stage::VALUES, "`", "`", "and")
            ))
            .one_of(Stage::VALUES)
            .with_default(Stage::PostPlan.as_str()),
        )
}

/// Components of an import id `<organization>/<workspace name>/<task name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId<'a> {
    pub organization: &'a str,
    pub workspace: &'a str,
    pub task: &'a str,
}

/// Split an import id into exactly three non-empty segments
pub fn parse_import_id(id: &str) -> Result<ImportId<'_>> {
    let parts: Vec<&str> = id.split('/').collect();
    match parts.as_slice() {
        [organization, workspace, task]
            if !organization.is_empty() && !workspace.is_empty() && !task.is_empty() =>
        {
            Ok(ImportId {
                organization: *organization,
                workspace: *workspace,
                task: *task,
            })
        }
        _ => Err(ResourceError::InvalidFormat(id.to_string())),
    }
}

/// Adapter between `workspace_run_task` state and the remote service
#[derive(Clone)]
pub struct WorkspaceRunTaskResource {
    client: Arc<dyn RemoteClient>,
}

impl WorkspaceRunTaskResource {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for WorkspaceRunTaskResource {
    type Model = WorkspaceRunTaskModel;

    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}{}", provider_type_name, TYPE_NAME_SUFFIX)
    }

    fn schema(&self) -> Schema {
        workspace_run_task_schema()
    }

    async fn create(&self, plan: &WorkspaceRunTaskModel) -> Result<WorkspaceRunTaskModel> {
        let task_id = plan.task_id.as_str();
        let task = self.client.read_run_task(task_id).await.map_err(|e| {
            ResourceError::lookup(
                Operation::Create,
                format!("Could not read Organization Run Task {}", task_id),
                e,
            )
        })?;

        let workspace_id = plan.workspace_id.as_str();
        self.client
            .read_workspace_by_id(workspace_id)
            .await
            .map_err(|e| {
                ResourceError::lookup(
                    Operation::Create,
                    format!("Could not read Workspace {}", workspace_id),
                    e,
                )
            })?;

        let options = WorkspaceRunTaskCreateOptions {
            run_task_id: task.id,
            enforcement_level: plan.enforcement_level,
            stage: Some(plan.stage.unwrap_or_default()),
        };

        tracing::debug!("Create task {} in workspace: {}", task_id, workspace_id);
        let wstask = self
            .client
            .create_workspace_run_task(workspace_id, &options)
            .await
            .map_err(|e| {
                ResourceError::remote(Operation::Create, "Unable to create workspace task", e)
            })?;

        Ok(model_from_record(&wstask).or_identity(workspace_id, task_id))
    }

    async fn read(&self, state: &WorkspaceRunTaskModel) -> Result<Option<WorkspaceRunTaskModel>> {
        let wstask_id = state.require_id()?;
        let workspace_id = state.workspace_id.as_str();

        tracing::debug!("Reading workspace run task {} in workspace {}", wstask_id, workspace_id);
        match self
            .client
            .read_workspace_run_task(workspace_id, wstask_id)
            .await
        {
            Ok(wstask) => Ok(Some(
                model_from_record(&wstask).or_identity(workspace_id, &state.task_id),
            )),
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    "Workspace run task {} no longer exists in workspace {}, removing from state",
                    wstask_id,
                    workspace_id
                );
                Ok(None)
            }
            Err(e) => Err(ResourceError::remote(
                Operation::Read,
                format!(
                    "Could not read Workspace Run Task {} in workspace {}, unexpected error",
                    wstask_id, workspace_id
                ),
                e,
            )),
        }
    }

    async fn update(&self, plan: &WorkspaceRunTaskModel) -> Result<WorkspaceRunTaskModel> {
        let wstask_id = plan.require_id()?;
        let workspace_id = plan.workspace_id.as_str();

        let options = WorkspaceRunTaskUpdateOptions {
            enforcement_level: plan.enforcement_level,
            stage: plan.stage,
        };

        tracing::debug!("Update task {} in workspace {}", wstask_id, workspace_id);
        let wstask = self
            .client
            .update_workspace_run_task(workspace_id, wstask_id, &options)
            .await
            .map_err(|e| {
                ResourceError::remote(Operation::Update, "Unable to update workspace task", e)
            })?;

        Ok(model_from_record(&wstask).or_identity(workspace_id, &plan.task_id))
    }

    async fn delete(&self, state: &WorkspaceRunTaskModel) -> Result<()> {
        let wstask_id = state.require_id()?;
        let workspace_id = state.workspace_id.as_str();

        tracing::debug!("Delete task {} in workspace {}", wstask_id, workspace_id);
        match self
            .client
            .delete_workspace_run_task(workspace_id, wstask_id)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!("Workspace run task {} already deleted", wstask_id);
                Ok(())
            }
            Err(e) => Err(ResourceError::remote(
                Operation::Delete,
                format!(
                    "Couldn't delete task {} in workspace {}",
                    wstask_id, workspace_id
                ),
                e,
            )),
        }
    }

    async fn import_state(&self, id: &str) -> Result<WorkspaceRunTaskModel> {
        let import = parse_import_id(id)?;

        tracing::debug!(
            "Importing task {} in workspace {}/{}",
            import.task,
            import.organization,
            import.workspace
        );

        let workspace = self
            .client
            .read_workspace(import.organization, import.workspace)
            .await
            .map_err(|e| {
                ResourceError::lookup(
                    Operation::Import,
                    format!(
                        "Could not read Workspace {}/{}",
                        import.organization, import.workspace
                    ),
                    e,
                )
            })?;

        // Associations only reference tasks by id
        let tasks = self
            .client
            .list_run_tasks(import.organization)
            .await
            .map_err(|e| {
                ResourceError::lookup(
                    Operation::Import,
                    format!(
                        "Could not list run tasks in organization {}",
                        import.organization
                    ),
                    e,
                )
            })?;
        let Some(task) = tasks.into_iter().find(|t| t.name == import.task) else {
            return Err(ResourceError::NotFound {
                operation: Operation::Import,
                detail: format!(
                    "Run task {} does not exist in organization {}",
                    import.task, import.organization
                ),
            });
        };

        let wstasks = self
            .client
            .list_workspace_run_tasks(&workspace.id)
            .await
            .map_err(|e| {
                ResourceError::lookup(
                    Operation::Import,
                    format!("Could not list run tasks of workspace {}", workspace.id),
                    e,
                )
            })?;

        let wstask = wstasks
            .into_iter()
            .find(|w| w.run_task.as_deref() == Some(task.id.as_str()))
            .ok_or_else(|| ResourceError::NotFound {
                operation: Operation::Import,
                detail: "Workspace task does not exist or has no details".to_string(),
            })?;

        Ok(model_from_record(&wstask).or_identity(&workspace.id, &task.id))
    }
}
