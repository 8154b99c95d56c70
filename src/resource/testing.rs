//! In-memory remote client for adapter tests

use crate::tfe::api::RemoteClient;
use crate::tfe::error::{Result, TfeError};
use crate::tfe::models::{RunTask, Workspace, WorkspaceRunTask};
use crate::tfe::workspace_run_tasks::{
    WorkspaceRunTaskCreateOptions, WorkspaceRunTaskUpdateOptions,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Store {
    tasks: BTreeMap<String, RunTask>,
    workspaces: BTreeMap<String, Workspace>,
    associations: BTreeMap<String, WorkspaceRunTask>,
    next_id: usize,
    last_update: Option<WorkspaceRunTaskUpdateOptions>,
    pending_failure: Option<TfeError>,
}

/// Fake service holding tasks, workspaces and associations in memory
#[derive(Default)]
pub(crate) struct FakeClient {
    store: Mutex<Store>,
    calls: AtomicUsize,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(self, id: &str, name: &str) -> Self {
        self.store.lock().unwrap().tasks.insert(
            id.to_string(),
            RunTask {
                id: id.to_string(),
                name: name.to_string(),
                url: format!("https://{}.example.com", name),
                category: "task".to_string(),
                enabled: true,
                description: None,
                organization: Some("acme".to_string()),
            },
        );
        self
    }

    pub fn with_workspace(self, id: &str, organization: &str, name: &str) -> Self {
        self.store.lock().unwrap().workspaces.insert(
            id.to_string(),
            Workspace {
                id: id.to_string(),
                name: name.to_string(),
                organization: Some(organization.to_string()),
                created_at: None,
            },
        );
        self
    }

    /// Make the next association call fail with `err`
    pub fn failing_with(self, err: TfeError) -> Self {
        self.store.lock().unwrap().pending_failure = Some(err);
        self
    }

    pub fn association_count(&self) -> usize {
        self.store.lock().unwrap().associations.len()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_update(&self) -> Option<WorkspaceRunTaskUpdateOptions> {
        self.store.lock().unwrap().last_update.clone()
    }

    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.store.lock().unwrap()
    }

    fn association_call(&self) -> Result<std::sync::MutexGuard<'_, Store>> {
        let mut store = self.store();
        match store.pending_failure.take() {
            Some(err) => Err(err),
            None => Ok(store),
        }
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn read_run_task(&self, task_id: &str) -> Result<RunTask> {
        self.store().tasks.get(task_id).cloned().ok_or(TfeError::NotFound)
    }

    async fn list_run_tasks(&self, organization: &str) -> Result<Vec<RunTask>> {
        Ok(self
            .store()
            .tasks
            .values()
            .filter(|t| t.organization.as_deref() == Some(organization))
            .cloned()
            .collect())
    }

    async fn read_workspace_by_id(&self, workspace_id: &str) -> Result<Workspace> {
        self.store()
            .workspaces
            .get(workspace_id)
            .cloned()
            .ok_or(TfeError::NotFound)
    }

    async fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace> {
        self.store()
            .workspaces
            .values()
            .find(|w| w.name == name && w.organization.as_deref() == Some(organization))
            .cloned()
            .ok_or(TfeError::NotFound)
    }

    async fn create_workspace_run_task(
        &self,
        workspace_id: &str,
        options: &WorkspaceRunTaskCreateOptions,
    ) -> Result<WorkspaceRunTask> {
        let mut store = self.association_call()?;
        store.next_id += 1;
        let record = WorkspaceRunTask {
            id: format!("wstask-{}", store.next_id),
            enforcement_level: options.enforcement_level,
            stage: options.stage.unwrap_or_default(),
            run_task: Some(options.run_task_id.clone()),
            workspace: Some(workspace_id.to_string()),
        };
        store.associations.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn read_workspace_run_task(
        &self,
        workspace_id: &str,
        id: &str,
    ) -> Result<WorkspaceRunTask> {
        self.association_call()?
            .associations
            .get(id)
            .filter(|a| a.workspace.as_deref() == Some(workspace_id))
            .cloned()
            .ok_or(TfeError::NotFound)
    }

    async fn update_workspace_run_task(
        &self,
        workspace_id: &str,
        id: &str,
        options: &WorkspaceRunTaskUpdateOptions,
    ) -> Result<WorkspaceRunTask> {
        let mut store = self.association_call()?;
        store.last_update = Some(options.clone());
        let record = store
            .associations
            .get_mut(id)
            .filter(|a| a.workspace.as_deref() == Some(workspace_id))
            .ok_or(TfeError::NotFound)?;
        record.enforcement_level = options.enforcement_level;
        if let Some(stage) = options.stage {
            record.stage = stage;
        }
        Ok(record.clone())
    }

    async fn delete_workspace_run_task(&self, workspace_id: &str, id: &str) -> Result<()> {
        let mut store = self.association_call()?;
        let exists = store
            .associations
            .get(id)
            .is_some_and(|a| a.workspace.as_deref() == Some(workspace_id));
        if !exists {
            return Err(TfeError::NotFound);
        }
        store.associations.remove(id);
        Ok(())
    }

    async fn list_workspace_run_tasks(&self, workspace_id: &str) -> Result<Vec<WorkspaceRunTask>> {
        Ok(self
            .association_call()?
            .associations
            .values()
            .filter(|a| a.workspace.as_deref() == Some(workspace_id))
            .cloned()
            .collect())
    }
}
