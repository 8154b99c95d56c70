//! Plan computation
//!
//! Compares prior state with configuration and decides what the host must
//! do. A change to any `requires_replace` attribute always plans a
//! destroy-then-create, never an in-place update.

use super::error::{ResourceError, Result};
use super::schema::Schema;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    Replace,
    Delete,
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedChange {
    pub action: PlanAction,
    /// State expected after apply; `None` when the resource goes away.
    /// Computed values not yet known are `null`.
    pub planned_state: Option<Value>,
    /// Attributes whose change forces replacement
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_replace: Vec<String>,
}

fn get<'a>(state: &'a Map<String, Value>, name: &str) -> &'a Value {
    state.get(name).unwrap_or(&Value::Null)
}

/// Plan the change from `prior` to `config`
///
/// `prior` is `None` when the resource does not exist yet; `config` is
/// `None` when it has been removed from configuration.
pub fn plan(
    schema: &Schema,
    prior: Option<&Value>,
    config: Option<&Value>,
) -> Result<PlannedChange> {
    let prior = match prior {
        Some(Value::Null) | None => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            return Err(ResourceError::InvalidState(
                "prior state must be an object".to_string(),
            ))
        }
    };

    let Some(config) = config.filter(|c| !c.is_null()) else {
        let action = if prior.is_some() {
            PlanAction::Delete
        } else {
            PlanAction::NoOp
        };
        return Ok(PlannedChange {
            action,
            planned_state: None,
            requires_replace: Vec::new(),
        });
    };

    let diagnostics = schema.validate(config);
    if !diagnostics.is_empty() {
        return Err(ResourceError::Validation(diagnostics));
    }
    let config = match config.as_object() {
        Some(map) => schema.apply_defaults(map),
        None => return Err(ResourceError::Validation(schema.validate(config))),
    };

    let mut planned = Map::new();
    for (name, attr) in &schema.attributes {
        let configured = get(&config, name);
        let value = if !configured.is_null() {
            configured.clone()
        } else if attr.mode.is_computed() && attr.use_state_for_unknown {
            prior.map(|p| get(p, name).clone()).unwrap_or(Value::Null)
        } else {
            Value::Null
        };
        planned.insert(name.clone(), value);
    }

    let Some(prior) = prior else {
        return Ok(PlannedChange {
            action: PlanAction::Create,
            planned_state: Some(Value::Object(planned)),
            requires_replace: Vec::new(),
        });
    };

    let requires_replace: Vec<String> = schema
        .attributes
        .iter()
        .filter(|(name, attr)| attr.requires_replace && get(prior, name) != get(&planned, name))
        .map(|(name, _)| name.clone())
        .collect();

    if !requires_replace.is_empty() {
        // The replacement gets fresh computed values
        for (name, attr) in &schema.attributes {
            if attr.mode == super::schema::AttributeMode::Computed {
                planned.insert(name.clone(), Value::Null);
            }
        }
        return Ok(PlannedChange {
            action: PlanAction::Replace,
            planned_state: Some(Value::Object(planned)),
            requires_replace,
        });
    }

    let changed = schema
        .attributes
        .iter()
        .filter(|(_, attr)| attr.mode.is_configurable())
        .any(|(name, _)| get(prior, name) != get(&planned, name));

    let action = if changed {
        PlanAction::Update
    } else {
        PlanAction::NoOp
    };

    Ok(PlannedChange {
        action,
        planned_state: Some(Value::Object(planned)),
        requires_replace: Vec::new(),
    })
}
