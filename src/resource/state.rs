//! Workspace run task state model

use super::error::{ResourceError, Result};
use crate::tfe::models::{EnforcementLevel, Stage, WorkspaceRunTask};
use serde::{Deserialize, Serialize};

/// State of a `workspace_run_task` resource as stored by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceRunTaskModel {
    /// Service-assigned id, unknown until created
    #[serde(default)]
    pub id: Option<String>,
    pub workspace_id: String,
    pub task_id: String,
    pub enforcement_level: EnforcementLevel,
    #[serde(default)]
    pub stage: Option<Stage>,
}

impl WorkspaceRunTaskModel {
    /// The stored id, required by every call after create
    pub fn require_id(&self) -> Result<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ResourceError::InvalidState("state has no id".to_string()))
    }

    /// Fill identity fields the service left out of a response
    pub(crate) fn or_identity(mut self, workspace_id: &str, task_id: &str) -> Self {
        if self.workspace_id.is_empty() {
            self.workspace_id = workspace_id.to_string();
        }
        if self.task_id.is_empty() {
            self.task_id = task_id.to_string();
        }
        self
    }
}

/// Map a service record to resource state
pub fn model_from_record(record: &WorkspaceRunTask) -> WorkspaceRunTaskModel {
    WorkspaceRunTaskModel {
        id: Some(record.id.clone()),
        workspace_id: record.workspace.clone().unwrap_or_default(),
        task_id: record.run_task.clone().unwrap_or_default(),
        enforcement_level: record.enforcement_level,
        stage: Some(record.stage),
    }
}

impl From<&WorkspaceRunTask> for WorkspaceRunTaskModel {
    fn from(record: &WorkspaceRunTask) -> Self {
        model_from_record(record)
    }
}
