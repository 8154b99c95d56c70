//! Declarative schema
//!
//! String-attribute schemas with the constraints the run task resources
//! need: required/optional/computed modes, static defaults, closed value
//! sets, and plan modifiers for replacement and stable computed values.

use super::error::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How an attribute may be supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    /// Must be set in configuration
    Required,
    /// May be set in configuration
    Optional,
    /// Set by the service only
    Computed,
    /// May be set; otherwise filled by a default or the service
    OptionalComputed,
}

impl AttributeMode {
    pub fn is_computed(&self) -> bool {
        matches!(self, AttributeMode::Computed | AttributeMode::OptionalComputed)
    }

    pub fn is_configurable(&self) -> bool {
        !matches!(self, AttributeMode::Computed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StringAttribute {
    pub description: String,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<&'static [&'static str]>,
    /// A change destroys and recreates the resource
    pub requires_replace: bool,
    /// Keep the prior value while planning instead of marking it unknown
    pub use_state_for_unknown: bool,
}

impl StringAttribute {
    fn new(mode: AttributeMode, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            mode,
            default: None,
            one_of: None,
            requires_replace: false,
            use_state_for_unknown: false,
        }
    }

    pub fn required(description: impl Into<String>) -> Self {
        Self::new(AttributeMode::Required, description)
    }

    pub fn optional(description: impl Into<String>) -> Self {
        Self::new(AttributeMode::Optional, description)
    }

    pub fn computed(description: impl Into<String>) -> Self {
        Self::new(AttributeMode::Computed, description)
    }

    pub fn optional_computed(description: impl Into<String>) -> Self {
        Self::new(AttributeMode::OptionalComputed, description)
    }

    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = Some(values);
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn use_state_for_unknown(mut self) -> Self {
        self.use_state_for_unknown = true;
        self
    }

    /// Check a configured value against the attribute's value set
    pub fn validate_value(&self, name: &str, value: &str) -> Option<Diagnostic> {
        let allowed = self.one_of?;
        if allowed.contains(&value) {
            return None;
        }
        let quoted: Vec<String> = allowed.iter().map(|v| format!("{:?}", v)).collect();
        Some(Diagnostic::attribute(
            name,
            "Invalid Attribute Value Match",
            format!(
                "Attribute {} value must be one of: [{}], got: {:?}",
                name,
                quoted.join(" "),
                value
            ),
        ))
    }
}

/// Resource schema
#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub version: i64,
    pub attributes: BTreeMap<String, StringAttribute>,
}

impl Schema {
    pub fn new(version: i64) -> Self {
        Self {
            version,
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(mut self, name: &str, attribute: StringAttribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&StringAttribute> {
        self.attributes.get(name)
    }

    /// Validate a configuration object, collecting every problem
    pub fn validate(&self, config: &Value) -> Vec<Diagnostic> {
        let Some(config) = config.as_object() else {
            return vec![Diagnostic::new(
                "Invalid configuration",
                "configuration must be an object of attribute values",
            )];
        };

        let mut diagnostics = Vec::new();

        for key in config.keys() {
            if !self.attributes.contains_key(key) {
                diagnostics.push(Diagnostic::attribute(
                    key,
                    "Unsupported argument",
                    format!("An argument named {:?} is not expected here.", key),
                ));
            }
        }

        for (name, attr) in &self.attributes {
            let value = config.get(name).filter(|v| !v.is_null());
            match (value, attr.mode) {
                (None, AttributeMode::Required) => diagnostics.push(Diagnostic::attribute(
                    name,
                    "Missing required argument",
                    format!("The argument {:?} is required, but no definition was found.", name),
                )),
                (None, _) => {}
                (Some(_), AttributeMode::Computed) => diagnostics.push(Diagnostic::attribute(
                    name,
                    "Invalid Configuration for Read-Only Attribute",
                    format!("Cannot set value for attribute {:?}, it is computed.", name),
                )),
                (Some(Value::String(s)), _) => {
                    diagnostics.extend(attr.validate_value(name, s));
                }
                (Some(other), _) => diagnostics.push(Diagnostic::attribute(
                    name,
                    "Incorrect attribute value type",
                    format!("Attribute {:?} must be a string, got {}", name, other),
                )),
            }
        }

        diagnostics
    }

    /// Configuration with defaults filled in for unset attributes
    pub fn apply_defaults(&self, config: &Map<String, Value>) -> Map<String, Value> {
        let mut out = config.clone();
        for (name, attr) in &self.attributes {
            let unset = out.get(name).map_or(true, Value::is_null);
            if unset {
                if let Some(default) = attr.default {
                    out.insert(name.clone(), Value::String(default.to_string()));
                }
            }
        }
        out
    }
}

/// Turn a list of values into an English sentence for documentation
///
/// `["a", "b", "c"]` with backtick prefix/suffix and "and" gives
/// `` `a`, `b` and `c` ``.
pub fn sentence_list(items: &[&str], prefix: &str, suffix: &str, conjunction: &str) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        out.push_str(prefix);
        out.push_str(item);
        out.push_str(suffix);
        if i + 1 < items.len() {
            if i + 2 < items.len() {
                out.push_str(", ");
            } else {
                out.push(' ');
                out.push_str(conjunction);
                out.push(' ');
            }
        }
    }
    out
}
