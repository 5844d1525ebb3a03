//! Declarative parameter schema.
//!
//! A schema is an ordered list of [`ParameterDefinition`]s plus an explicit
//! name → callback map for cross-field constraints. Declaration order is
//! the order in which controls are stacked on the panel.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::control::ControlKind;
use crate::dependency::{Cascade, DependencyCallback, DependencyRule};

/// Error type for schema entries that cannot become a control.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("Parameter '{name}' has unsupported control kind '{kind}'")]
    UnsupportedKind { name: String, kind: String },
    #[error("Parameter '{0}' is declared more than once")]
    DuplicateName(String),
    #[error("Parameter name must not be empty")]
    EmptyName,
    #[error("Select parameter '{0}' has no options")]
    NoOptions(String),
}

/// One `(label, value)` entry of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Static description of one tunable parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Query-string key and control lookup key.
    pub name: String,
    /// Declared kind, parsed when the control is built.
    #[serde(rename = "kind")]
    pub control_kind: String,
    #[serde(default)]
    pub description: String,
    /// Attributes applied to the rendered element (e.g. `min`, `max`).
    #[serde(default)]
    pub constraints: Vec<(String, String)>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<DependencyRule>,
}

impl ParameterDefinition {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            control_kind: kind.into(),
            description: description.into(),
            constraints: Vec::new(),
            options: Vec::new(),
            default: None,
            dependency: None,
        }
    }

    #[must_use]
    pub fn with_constraint(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.push((attribute.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_option(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_dependency(mut self, rule: DependencyRule) -> Self {
        self.dependency = Some(rule);
        self
    }

    /// Parses the declared control kind.
    pub fn kind(&self) -> Result<ControlKind, SchemaError> {
        ControlKind::parse(&self.control_kind).ok_or_else(|| SchemaError::UnsupportedKind {
            name: self.name.clone(),
            kind: self.control_kind.clone(),
        })
    }
}

#[derive(Deserialize)]
struct SchemaDocument {
    parameters: Vec<ParameterDefinition>,
}

/// Ordered parameter definitions with their dependency callbacks.
#[derive(Clone, Default)]
pub struct ParameterSchema {
    definitions: Vec<ParameterDefinition>,
    callbacks: HashMap<String, DependencyCallback>,
}

impl ParameterSchema {
    /// Creates a schema, registering a callback for every declared rule.
    pub fn new(definitions: Vec<ParameterDefinition>) -> Self {
        let callbacks = definitions
            .iter()
            .filter_map(|definition| {
                let rule = definition.dependency.clone()?;
                Some((definition.name.clone(), rule.into_callback()))
            })
            .collect();
        Self {
            definitions,
            callbacks,
        }
    }

    /// The graph panel schema: hour window, max line toggle and step.
    pub fn standard() -> Self {
        Self::new(vec![
            ParameterDefinition::new("Gstart", ControlKind::Numeric, "Start hour")
                .with_constraint("min", "0")
                .with_constraint("max", "23")
                .with_default("0")
                .with_dependency(DependencyRule::PushForward {
                    sibling: "Gend".to_string(),
                    gap: 1,
                }),
            ParameterDefinition::new("Gend", ControlKind::Numeric, "End hour")
                .with_constraint("min", "1")
                .with_constraint("max", "24")
                .with_default("24")
                .with_dependency(DependencyRule::PullBack {
                    sibling: "Gstart".to_string(),
                    gap: 1,
                }),
            ParameterDefinition::new("Gmaxline", ControlKind::Checkbox, "Show max line"),
            ParameterDefinition::new("Gmaxlinestep", ControlKind::Select, "Max line step")
                .with_option("hourly", "3600")
                .with_option("6-hourly", "21600")
                .with_option("daily", "86400")
                .with_option("weekly", "604800"),
        ])
    }

    /// Parses a `{"parameters": [...]}` document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Registers `callback` for `name`, replacing any declared rule.
    #[must_use]
    pub fn with_callback(
        mut self,
        name: impl Into<String>,
        callback: impl Fn(&mut Cascade<'_>) + 'static,
    ) -> Self {
        let callback: DependencyCallback = Rc::new(callback);
        self.callbacks.insert(name.into(), callback);
        self
    }

    pub fn definitions(&self) -> &[ParameterDefinition] {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&ParameterDefinition> {
        self.definitions.iter().find(|definition| definition.name == name)
    }

    /// Dependency callback registered for `name`.
    pub fn callback(&self, name: &str) -> Option<&DependencyCallback> {
        self.callbacks.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl fmt::Debug for ParameterSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut callbacks: Vec<_> = self.callbacks.keys().collect();
        callbacks.sort();
        f.debug_struct("ParameterSchema")
            .field("definitions", &self.definitions)
            .field("callbacks", &callbacks)
            .finish()
    }
}

impl<'de> Deserialize<'de> for ParameterSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        SchemaDocument::deserialize(deserializer).map(|document| Self::new(document.parameters))
    }
}
