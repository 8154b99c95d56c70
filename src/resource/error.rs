//! Resource errors and diagnostics

use crate::tfe::TfeError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Lifecycle phase an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Validate,
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    /// Diagnostic summary for failures in this phase
    pub fn summary(&self) -> &'static str {
        match self {
            Operation::Validate => "Invalid configuration",
            Operation::Create => "Error creating workspace run task",
            Operation::Read => "Error reading workspace run task",
            Operation::Update => "Error updating workspace run task",
            Operation::Delete => "Error deleting workspace run task",
            Operation::Import => "Error importing workspace run task",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Validate => "validate",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        };
        f.write_str(name)
    }
}

/// User-facing problem report, attached to an attribute when one is at fault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn new(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn attribute(
        attribute: &str,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            detail: detail.into(),
            attribute: Some(attribute.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.attribute {
            Some(attr) => write!(f, "{} ({}): {}", self.summary, attr, self.detail),
            None => write!(f, "{}: {}", self.summary, self.detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    /// A referenced task, workspace or association does not exist
    #[error("{detail}")]
    NotFound { operation: Operation, detail: String },

    /// Malformed import identifier; no remote call was made
    #[error("Invalid task input format: {0} (expected <ORGANIZATION>/<WORKSPACE NAME>/<TASK NAME>)")]
    InvalidFormat(String),

    /// Any other failure from the remote service
    #[error("{context}: {source}")]
    Remote {
        operation: Operation,
        context: String,
        #[source]
        source: TfeError,
    },

    /// Configuration rejected by the schema
    #[error("{}", .0.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<Diagnostic>),

    /// Stored or planned state cannot be interpreted
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ResourceError {
    /// Map a failed lookup of a referenced object: not-found becomes
    /// `NotFound`, anything else stays a remote error.
    pub(crate) fn lookup(operation: Operation, context: String, err: TfeError) -> Self {
        if err.is_not_found() {
            ResourceError::NotFound {
                operation,
                detail: format!("{}: {}", context, err),
            }
        } else {
            ResourceError::Remote {
                operation,
                context,
                source: err,
            }
        }
    }

    pub(crate) fn remote(operation: Operation, context: impl Into<String>, err: TfeError) -> Self {
        ResourceError::Remote {
            operation,
            context: context.into(),
            source: err,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound { .. })
    }

    /// Render as diagnostics for the host
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            ResourceError::NotFound { operation, .. } | ResourceError::Remote { operation, .. } => {
                vec![Diagnostic::new(operation.summary(), self.to_string())]
            }
            ResourceError::InvalidFormat(_) => {
                vec![Diagnostic::new(Operation::Import.summary(), self.to_string())]
            }
            ResourceError::Validation(diags) => diags.clone(),
            ResourceError::InvalidState(_) => {
                vec![Diagnostic::new("Invalid state", self.to_string())]
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
