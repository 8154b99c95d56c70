//! Host-side lifecycle driver
//!
//! Executes a planned change against a [`Resource`] and produces the state
//! the host should store. State is `None` once the resource is gone.

use super::error::Result;
use super::plan::{plan, PlanAction, PlannedChange};
use super::Resource;
use serde_json::Value;

/// Plan `prior` → `config` for `resource`
pub fn plan_change<R: Resource>(
    resource: &R,
    prior: Option<&Value>,
    config: Option<&Value>,
) -> Result<PlannedChange> {
    plan(&resource.schema(), prior, config)
}

/// Apply a planned change
pub async fn apply<R: Resource>(
    resource: &R,
    prior: Option<&Value>,
    change: &PlannedChange,
) -> Result<Option<Value>> {
    tracing::info!("Applying {:?}", change.action);

    match change.action {
        PlanAction::NoOp => Ok(prior.filter(|p| !p.is_null()).cloned()),
        PlanAction::Create => {
            let planned = resource.model_from_state(planned_state(change)?)?;
            let created = resource.create(&planned).await?;
            resource.state_from_model(&created).map(Some)
        }
        PlanAction::Update => {
            let planned = resource.model_from_state(planned_state(change)?)?;
            let updated = resource.update(&planned).await?;
            resource.state_from_model(&updated).map(Some)
        }
        PlanAction::Replace => {
            // Destroy before create: the service allows one association per task and workspace
            if let Some(prior) = prior {
                let current = resource.model_from_state(prior)?;
                resource.delete(&current).await?;
            }
            let planned = resource.model_from_state(planned_state(change)?)?;
            let created = resource.create(&planned).await?;
            resource.state_from_model(&created).map(Some)
        }
        PlanAction::Delete => {
            if let Some(prior) = prior {
                let current = resource.model_from_state(prior)?;
                resource.delete(&current).await?;
            }
            Ok(None)
        }
    }
}

/// Refresh stored state from the service
pub async fn refresh<R: Resource>(resource: &R, state: &Value) -> Result<Option<Value>> {
    let current = resource.model_from_state(state)?;
    match resource.read(&current).await? {
        Some(model) => resource.state_from_model(&model).map(Some),
        None => Ok(None),
    }
}

/// Import an existing object by its import id
pub async fn import<R: Resource>(resource: &R, id: &str) -> Result<Value> {
    let model = resource.import_state(id).await?;
    resource.state_from_model(&model)
}

fn planned_state(change: &PlannedChange) -> Result<&Value> {
    change.planned_state.as_ref().ok_or_else(|| {
        super::error::ResourceError::InvalidState(format!(
            "{:?} plan has no planned state",
            change.action
        ))
    })
}
