//! TFE API models
//!
//! Records decoded from JSON:API documents, plus the closed string enums the
//! API accepts for run task associations and variables.

use super::error::{Result, TfeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string that is not a member of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} {value:?}, expected one of: {}", .allowed.join(", "))]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

/// How a failing task affects the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementLevel {
    /// Failures are reported but do not block the run
    Advisory,
    /// Failures block the run
    Mandatory,
}

impl EnforcementLevel {
    pub const VALUES: &'static [&'static str] = &["advisory", "mandatory"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnforcementLevel::Advisory => "advisory",
            EnforcementLevel::Mandatory => "mandatory",
        }
    }
}

impl fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnforcementLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "advisory" => Ok(EnforcementLevel::Advisory),
            "mandatory" => Ok(EnforcementLevel::Mandatory),
            _ => Err(ParseEnumError {
                kind: "enforcement level",
                value: s.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

/// Run pipeline phase at which a task is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PrePlan,
    #[default]
    PostPlan,
    PreApply,
    PostApply,
}

impl Stage {
    pub const VALUES: &'static [&'static str] =
        &["pre_plan", "post_plan", "pre_apply", "post_apply"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PrePlan => "pre_plan",
            Stage::PostPlan => "post_plan",
            Stage::PreApply => "pre_apply",
            Stage::PostApply => "post_apply",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pre_plan" => Ok(Stage::PrePlan),
            "post_plan" => Ok(Stage::PostPlan),
            "pre_apply" => Ok(Stage::PreApply),
            "post_apply" => Ok(Stage::PostApply),
            _ => Err(ParseEnumError {
                kind: "stage",
                value: s.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

/// Variable category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableCategory {
    Env,
    Terraform,
}

impl VariableCategory {
    pub const VALUES: &'static [&'static str] = &["env", "terraform"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariableCategory::Env => "env",
            VariableCategory::Terraform => "terraform",
        }
    }
}

impl fmt::Display for VariableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "env" => Ok(VariableCategory::Env),
            "terraform" => Ok(VariableCategory::Terraform),
            _ => Err(ParseEnumError {
                kind: "variable category",
                value: s.to_string(),
                allowed: Self::VALUES,
            }),
        }
    }
}

// =========================================================================
// JSON:API helpers
// =========================================================================

/// Primary `data` object of a single-resource document
pub(crate) fn document_data<'a>(doc: &'a Value, what: &str) -> Result<&'a Value> {
    doc.get("data")
        .filter(|d| d.is_object())
        .ok_or_else(|| TfeError::decode(what, "missing data object"))
}

fn resource_id(data: &Value, what: &str) -> Result<String> {
    data.get("id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| TfeError::decode(what, "missing id"))
}

fn attribute<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get("attributes").and_then(|a| a.get(key))
}

fn attribute_str(data: &Value, key: &str) -> Option<String> {
    attribute(data, key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn attribute_bool(data: &Value, key: &str) -> bool {
    attribute(data, key)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn attribute_time(data: &Value, key: &str) -> Option<DateTime<Utc>> {
    attribute(data, key)
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// `relationships.<name>.data.id`, if the relationship is populated
fn relationship_id(data: &Value, name: &str) -> Option<String> {
    data.get("relationships")
        .and_then(|r| r.get(name))
        .and_then(|r| r.get("data"))
        .and_then(|d| d.get("id"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

// =========================================================================
// Records
// =========================================================================

/// Organization
#[derive(Debug, Clone, PartialEq)]
pub struct Organization {
    pub name: String,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<&Value> for Organization {
    type Error = TfeError;

    fn try_from(data: &Value) -> Result<Self> {
        Ok(Self {
            // The organization id is its name
            name: resource_id(data, "organization")?,
            email: attribute_str(data, "email"),
            created_at: attribute_time(data, "created-at"),
        })
    }
}

/// Workspace
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub organization: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<&Value> for Workspace {
    type Error = TfeError;

    fn try_from(data: &Value) -> Result<Self> {
        Ok(Self {
            id: resource_id(data, "workspace")?,
            name: attribute_str(data, "name").unwrap_or_default(),
            organization: relationship_id(data, "organization"),
            created_at: attribute_time(data, "created-at"),
        })
    }
}

/// Organization run task
#[derive(Debug, Clone, PartialEq)]
pub struct RunTask {
    pub id: String,
    pub name: String,
    pub url: String,
    pub category: String,
    pub enabled: bool,
    pub description: Option<String>,
    pub organization: Option<String>,
}

impl TryFrom<&Value> for RunTask {
    type Error = TfeError;

    fn try_from(data: &Value) -> Result<Self> {
        Ok(Self {
            id: resource_id(data, "run task")?,
            name: attribute_str(data, "name").unwrap_or_default(),
            url: attribute_str(data, "url").unwrap_or_default(),
            category: attribute_str(data, "category").unwrap_or_else(|| "task".to_string()),
            enabled: attribute_bool(data, "enabled"),
            description: attribute_str(data, "description"),
            organization: relationship_id(data, "organization"),
        })
    }
}

/// Association binding a run task to a workspace
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceRunTask {
    pub id: String,
    pub enforcement_level: EnforcementLevel,
    pub stage: Stage,
    /// Id of the associated run task, when the relationship is present
    pub run_task: Option<String>,
    /// Id of the owning workspace, when the relationship is present
    pub workspace: Option<String>,
}

impl TryFrom<&Value> for WorkspaceRunTask {
    type Error = TfeError;

    fn try_from(data: &Value) -> Result<Self> {
        let id = resource_id(data, "workspace run task")?;

        let enforcement_level = attribute_str(data, "enforcement-level")
            .ok_or_else(|| TfeError::decode("workspace run task", "missing enforcement-level"))?
            .parse::<EnforcementLevel>()
            .map_err(|e| TfeError::decode("workspace run task", e))?;

        // Older service versions predate stages; everything ran post-plan
        let stage = match attribute_str(data, "stage") {
            Some(s) => s
                .parse::<Stage>()
                .map_err(|e| TfeError::decode("workspace run task", e))?,
            None => Stage::default(),
        };

        Ok(Self {
            id,
            enforcement_level,
            stage,
            run_task: relationship_id(data, "task"),
            workspace: relationship_id(data, "workspace"),
        })
    }
}

/// Registry module test variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: String,
    pub key: String,
    pub value: String,
    pub description: String,
    pub category: VariableCategory,
    pub hcl: bool,
    pub sensitive: bool,
}

impl TryFrom<&Value> for Variable {
    type Error = TfeError;

    fn try_from(data: &Value) -> Result<Self> {
        let category = attribute_str(data, "category")
            .ok_or_else(|| TfeError::decode("variable", "missing category"))?
            .parse::<VariableCategory>()
            .map_err(|e| TfeError::decode("variable", e))?;

        Ok(Self {
            id: resource_id(data, "variable")?,
            key: attribute_str(data, "key").unwrap_or_default(),
            // Sensitive values are never returned
            value: attribute_str(data, "value").unwrap_or_default(),
            description: attribute_str(data, "description").unwrap_or_default(),
            category,
            hcl: attribute_bool(data, "hcl"),
            sensitive: attribute_bool(data, "sensitive"),
        })
    }
}
