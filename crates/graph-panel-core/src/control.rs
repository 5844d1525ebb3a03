//! Runtime controls built from parameter definitions.

use std::fmt;

use crate::panel::PanelError;
use crate::schema::{ParameterDefinition, SchemaError, SelectOption};

/// The widget kinds a parameter can be rendered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// Free text input.
    Text,
    /// Numeric input; `min`/`max` constraints become soft browser validation.
    Numeric,
    /// Checkbox emitting `1`/`0`.
    Checkbox,
    /// Drop-down populated from the definition's options.
    Select,
}

impl ControlKind {
    /// Parses a declared kind name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" | "text-input" => Some(Self::Text),
            "number" | "numeric" | "numeric-input" => Some(Self::Numeric),
            "checkbox" => Some(Self::Checkbox),
            "select" => Some(Self::Select),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Numeric => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
        }
    }

    /// The `type` attribute for input-based kinds.
    pub fn input_type(self) -> Option<&'static str> {
        match self {
            Self::Text => Some("text"),
            Self::Numeric => Some("number"),
            Self::Checkbox => Some("checkbox"),
            Self::Select => None,
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ControlKind> for String {
    fn from(kind: ControlKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Current value held by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlValue {
    Text(String),
    Checked(bool),
}

impl ControlValue {
    /// The value written into the query string.
    ///
    /// Checkboxes always emit `1` or `0`, never the raw checked flag.
    pub fn emitted(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Checked(true) => "1".to_string(),
            Self::Checked(false) => "0".to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Checked(_) => None,
        }
    }

    pub fn is_checked(&self) -> bool {
        matches!(self, Self::Checked(true))
    }
}

impl From<&str> for ControlValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ControlValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<bool> for ControlValue {
    fn from(checked: bool) -> Self {
        Self::Checked(checked)
    }
}

/// A control bound to exactly one parameter definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    name: String,
    kind: ControlKind,
    label: String,
    constraints: Vec<(String, String)>,
    options: Vec<SelectOption>,
    default: ControlValue,
    value: ControlValue,
}

impl Control {
    /// Builds the control for `definition`.
    ///
    /// Fails for an empty name, an unsupported kind, or a select without
    /// options.
    pub fn build(definition: &ParameterDefinition) -> Result<Self, SchemaError> {
        if definition.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let kind = definition.kind()?;

        let default = match kind {
            ControlKind::Checkbox => ControlValue::Checked(
                definition.default.as_deref().is_some_and(|raw| raw == "1"),
            ),
            ControlKind::Select => {
                let first = definition
                    .options
                    .first()
                    .ok_or_else(|| SchemaError::NoOptions(definition.name.clone()))?;
                let declared = definition
                    .default
                    .as_deref()
                    .filter(|raw| definition.options.iter().any(|o| o.value == *raw));
                ControlValue::Text(declared.unwrap_or(first.value.as_str()).to_string())
            }
            ControlKind::Text | ControlKind::Numeric => {
                ControlValue::Text(definition.default.clone().unwrap_or_default())
            }
        };

        let label = if definition.description.is_empty() {
            definition.name.clone()
        } else {
            definition.description.clone()
        };

        Ok(Self {
            name: definition.name.clone(),
            kind,
            label,
            constraints: definition.constraints.clone(),
            options: definition.options.clone(),
            value: default.clone(),
            default,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attribute/value pairs applied to the rendered element.
    pub fn constraints(&self) -> &[(String, String)] {
        &self.constraints
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn value(&self) -> &ControlValue {
        &self.value
    }

    /// The value this control contributes to the query string.
    pub fn emitted(&self) -> String {
        self.value.emitted()
    }

    /// Replaces the current value. Returns whether it changed.
    pub fn set_value(&mut self, value: ControlValue) -> Result<bool, PanelError> {
        let compatible = matches!(
            (self.kind, &value),
            (ControlKind::Checkbox, ControlValue::Checked(_))
                | (
                    ControlKind::Text | ControlKind::Numeric | ControlKind::Select,
                    ControlValue::Text(_)
                )
        );
        if !compatible {
            return Err(PanelError::KindMismatch {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        if self.value == value {
            return Ok(false);
        }
        self.value = value;
        Ok(true)
    }

    /// Initialises the value from a raw query-string value.
    ///
    /// Returns `false` and keeps the current value when the control cannot
    /// show `raw`: a checkbox value other than `0`/`1`, or a select value
    /// that is not one of its options.
    pub fn seed_from_query(&mut self, raw: &str) -> bool {
        let value = match self.kind {
            ControlKind::Checkbox => match raw {
                "1" => ControlValue::Checked(true),
                "0" => ControlValue::Checked(false),
                _ => return false,
            },
            ControlKind::Select => {
                if !self.options.iter().any(|option| option.value == raw) {
                    tracing::debug!(parameter = %self.name, value = raw, "query value is not a select option");
                    return false;
                }
                ControlValue::Text(raw.to_string())
            }
            ControlKind::Text | ControlKind::Numeric => ControlValue::Text(raw.to_string()),
        };
        self.value = value;
        true
    }

    /// Restores the declared default.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
    }
}

/// Ordered controls of one panel, addressable by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlSet {
    controls: Vec<Control>,
}

impl ControlSet {
    /// Appends `control`, rejecting a name already present.
    pub fn push(&mut self, control: Control) -> Result<(), SchemaError> {
        if self.get(control.name()).is_some() {
            return Err(SchemaError::DuplicateName(control.name));
        }
        self.controls.push(control);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|control| control.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.iter_mut().find(|control| control.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Control> {
        self.controls.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_definition() -> ParameterDefinition {
        ParameterDefinition::new("Gmaxlinestep", ControlKind::Select, "Max line step")
            .with_option("hourly", "3600")
            .with_option("daily", "86400")
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(ControlKind::parse("numeric-input"), Some(ControlKind::Numeric));
        assert_eq!(ControlKind::parse("text-input"), Some(ControlKind::Text));
        assert_eq!(ControlKind::parse("checkbox"), Some(ControlKind::Checkbox));
        assert_eq!(ControlKind::parse("slider"), None);
    }

    #[test]
    fn test_checkbox_emits_numeric_flag() {
        let definition = ParameterDefinition::new("Gmaxline", ControlKind::Checkbox, "Max line");
        let mut control = Control::build(&definition).unwrap();
        assert_eq!(control.emitted(), "0");

        control.set_value(ControlValue::Checked(true)).unwrap();
        assert_eq!(control.emitted(), "1");

        control.set_value(ControlValue::Checked(false)).unwrap();
        assert_eq!(control.emitted(), "0");
    }

    #[test]
    fn test_select_defaults_to_first_option() {
        let control = Control::build(&step_definition()).unwrap();
        assert_eq!(control.value(), &ControlValue::Text("3600".to_string()));
    }

    #[test]
    fn test_select_declared_default_must_be_an_option() {
        let control = Control::build(&step_definition().with_default("86400")).unwrap();
        assert_eq!(control.emitted(), "86400");

        let control = Control::build(&step_definition().with_default("7")).unwrap();
        assert_eq!(control.emitted(), "3600");
    }

    #[test]
    fn test_select_without_options_fails() {
        let definition = ParameterDefinition::new("Gmaxlinestep", ControlKind::Select, "");
        assert_eq!(
            Control::build(&definition),
            Err(SchemaError::NoOptions("Gmaxlinestep".to_string()))
        );
    }

    #[test]
    fn test_unsupported_kind_fails() {
        let definition = ParameterDefinition::new("Gcolor", "colour-wheel", "");
        assert!(matches!(
            Control::build(&definition),
            Err(SchemaError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_label_falls_back_to_name() {
        let definition = ParameterDefinition::new("Gend", ControlKind::Numeric, "");
        assert_eq!(Control::build(&definition).unwrap().label(), "Gend");
    }

    #[test]
    fn test_set_value_rejects_kind_mismatch() {
        let definition = ParameterDefinition::new("Gend", ControlKind::Numeric, "End");
        let mut control = Control::build(&definition).unwrap();
        assert!(control.set_value(ControlValue::Checked(true)).is_err());
        assert_eq!(control.set_value("5".into()), Ok(true));
        assert_eq!(control.set_value("5".into()), Ok(false));
    }

    #[test]
    fn test_seed_from_query() {
        let mut checkbox =
            Control::build(&ParameterDefinition::new("Gmaxline", ControlKind::Checkbox, "")).unwrap();
        assert!(checkbox.seed_from_query("1"));
        assert!(checkbox.value().is_checked());
        assert!(!checkbox.seed_from_query("true"));
        assert!(checkbox.value().is_checked());
        assert!(checkbox.seed_from_query("0"));
        assert!(!checkbox.value().is_checked());

        let mut select = Control::build(&step_definition()).unwrap();
        assert!(select.seed_from_query("86400"));
        assert_eq!(select.emitted(), "86400");
        assert!(!select.seed_from_query("42"));
        assert_eq!(select.emitted(), "86400");

        select.reset();
        assert_eq!(select.emitted(), "3600");
    }

    #[test]
    fn test_control_set_rejects_duplicates() {
        let definition = ParameterDefinition::new("Gend", ControlKind::Numeric, "End");
        let mut set = ControlSet::default();
        set.push(Control::build(&definition).unwrap()).unwrap();
        assert_eq!(
            set.push(Control::build(&definition).unwrap()),
            Err(SchemaError::DuplicateName("Gend".to_string()))
        );
        assert_eq!(set.len(), 1);
    }
}
