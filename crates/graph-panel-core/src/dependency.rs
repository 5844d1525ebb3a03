//! Cross-field constraints between sibling controls.
//!
//! A dependency callback runs after its own control changed and before that
//! control's value reaches the URL. It may correct sibling controls through
//! [`Cascade::adjust`]; every adjusted sibling then goes through its own
//! change cycle. The edited control is authoritative and cannot be adjusted
//! by its own callback.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::control::{Control, ControlSet, ControlValue};

/// Callback invoked with the cascade context of a changed control.
pub type DependencyCallback = Rc<dyn Fn(&mut Cascade<'_>)>;

const fn default_gap() -> i32 {
    1
}

/// Declarative numeric ordering between two parameters.
///
/// Values compare as decimals, so fractional input from a number field is
/// still ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum DependencyRule {
    /// Keeps `sibling >= self + gap` by moving the sibling forward.
    PushForward {
        sibling: String,
        #[serde(default = "default_gap")]
        gap: i32,
    },
    /// Keeps `sibling <= self - gap` by pulling the sibling back.
    PullBack {
        sibling: String,
        #[serde(default = "default_gap")]
        gap: i32,
    },
}

impl DependencyRule {
    pub fn into_callback(self) -> DependencyCallback {
        match self {
            Self::PushForward { sibling, gap } => Rc::new(move |cascade: &mut Cascade<'_>| {
                let Some((current, other)) = cascade.numeric_pair(&sibling) else {
                    return;
                };
                let floor = current + f64::from(gap);
                if other < floor {
                    cascade.adjust(&sibling, ControlValue::Text(floor.to_string()));
                }
            }),
            Self::PullBack { sibling, gap } => Rc::new(move |cascade: &mut Cascade<'_>| {
                let Some((current, other)) = cascade.numeric_pair(&sibling) else {
                    return;
                };
                let ceiling = current - f64::from(gap);
                if other > ceiling {
                    cascade.adjust(&sibling, ControlValue::Text(ceiling.to_string()));
                }
            }),
        }
    }
}

fn numeric(control: &Control) -> Option<f64> {
    let value: f64 = control.value().as_text()?.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

/// Context handed to a dependency callback.
pub struct Cascade<'a> {
    source: &'a str,
    controls: &'a mut ControlSet,
    raised: Vec<String>,
}

impl<'a> Cascade<'a> {
    pub(crate) fn new(source: &'a str, controls: &'a mut ControlSet) -> Self {
        Self {
            source,
            controls,
            raised: Vec::new(),
        }
    }

    /// Name of the control whose change triggered the callback.
    pub fn source_name(&self) -> &str {
        self.source
    }

    /// The control whose change triggered the callback.
    pub fn source(&self) -> Option<&Control> {
        self.controls.get(self.source)
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    /// Writes `value` into the sibling `name` and raises its change event.
    ///
    /// Returns `false` when nothing changed: the target is the source
    /// itself, does not exist, already holds `value`, or cannot hold it.
    pub fn adjust(&mut self, name: &str, value: ControlValue) -> bool {
        if name == self.source {
            tracing::warn!(parameter = name, "dependency callback tried to adjust its own control");
            return false;
        }
        let Some(control) = self.controls.get_mut(name) else {
            tracing::warn!(parameter = name, source = self.source, "dependency targets unknown sibling");
            return false;
        };
        match control.set_value(value) {
            Ok(true) => {
                tracing::debug!(parameter = name, source = self.source, "sibling adjusted");
                if !self.raised.iter().any(|raised| raised == name) {
                    self.raised.push(name.to_string());
                }
                true
            }
            Ok(false) => false,
            Err(err) => {
                tracing::warn!("{err}");
                false
            }
        }
    }

    /// Source and sibling values when both parse as finite numbers.
    fn numeric_pair(&self, sibling: &str) -> Option<(f64, f64)> {
        Some((numeric(self.source()?)?, numeric(self.control(sibling)?)?))
    }

    /// Siblings adjusted during this callback, in order of first adjustment.
    pub(crate) fn into_raised(self) -> Vec<String> {
        self.raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlKind;
    use crate::schema::ParameterDefinition;

    fn hours(start: &str, end: &str) -> ControlSet {
        let mut controls = ControlSet::default();
        for (name, value) in [("Gstart", start), ("Gend", end)] {
            let definition =
                ParameterDefinition::new(name, ControlKind::Numeric, "").with_default(value);
            controls.push(Control::build(&definition).unwrap()).unwrap();
        }
        controls
    }

    fn run(rule: DependencyRule, source: &str, controls: &mut ControlSet) -> Vec<String> {
        let callback = rule.into_callback();
        let mut cascade = Cascade::new(source, controls);
        callback(&mut cascade);
        cascade.into_raised()
    }

    fn push_forward() -> DependencyRule {
        DependencyRule::PushForward {
            sibling: "Gend".to_string(),
            gap: 1,
        }
    }

    fn pull_back() -> DependencyRule {
        DependencyRule::PullBack {
            sibling: "Gstart".to_string(),
            gap: 1,
        }
    }

    #[test]
    fn test_push_forward_moves_sibling() {
        let mut controls = hours("12", "10");
        let raised = run(push_forward(), "Gstart", &mut controls);
        assert_eq!(raised, ["Gend"]);
        assert_eq!(controls.get("Gend").unwrap().emitted(), "13");
    }

    #[test]
    fn test_push_forward_leaves_consistent_pair() {
        let mut controls = hours("5", "10");
        assert!(run(push_forward(), "Gstart", &mut controls).is_empty());
        assert_eq!(controls.get("Gend").unwrap().emitted(), "10");
    }

    #[test]
    fn test_push_forward_on_equal_values() {
        let mut controls = hours("10", "10");
        run(push_forward(), "Gstart", &mut controls);
        assert_eq!(controls.get("Gend").unwrap().emitted(), "11");
    }

    #[test]
    fn test_pull_back_moves_sibling() {
        let mut controls = hours("3", "2");
        let raised = run(pull_back(), "Gend", &mut controls);
        assert_eq!(raised, ["Gstart"]);
        assert_eq!(controls.get("Gstart").unwrap().emitted(), "1");
    }

    #[test]
    fn test_push_forward_on_fractional_start() {
        let mut controls = hours("12.5", "10");
        let raised = run(push_forward(), "Gstart", &mut controls);
        assert_eq!(raised, ["Gend"]);
        assert_eq!(controls.get("Gend").unwrap().emitted(), "13.5");
    }

    #[test]
    fn test_pull_back_on_fractional_end() {
        let mut controls = hours("3", "2.5");
        run(pull_back(), "Gend", &mut controls);
        assert_eq!(controls.get("Gstart").unwrap().emitted(), "1.5");

        let mut controls = hours("1", "2.5");
        assert!(run(pull_back(), "Gend", &mut controls).is_empty());
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let mut controls = hours("inf", "10");
        assert!(run(push_forward(), "Gstart", &mut controls).is_empty());
        assert_eq!(controls.get("Gend").unwrap().emitted(), "10");
    }

    #[test]
    fn test_non_numeric_values_are_ignored() {
        let mut controls = hours("", "10");
        assert!(run(push_forward(), "Gstart", &mut controls).is_empty());

        let mut controls = hours("4", "soon");
        assert!(run(push_forward(), "Gstart", &mut controls).is_empty());
        assert_eq!(controls.get("Gend").unwrap().emitted(), "soon");
    }

    #[test]
    fn test_adjust_refuses_source() {
        let mut controls = hours("1", "2");
        let mut cascade = Cascade::new("Gstart", &mut controls);
        assert!(!cascade.adjust("Gstart", "9".into()));
        assert!(!cascade.adjust("missing", "9".into()));
        assert!(!cascade.adjust("Gend", true.into()));
        assert!(cascade.into_raised().is_empty());
        assert_eq!(controls.get("Gstart").unwrap().emitted(), "1");
    }

    #[test]
    fn test_rule_json_shape() {
        let rule: DependencyRule =
            serde_json::from_str(r#"{"rule": "pull-back", "sibling": "Gstart", "gap": 2}"#)
                .unwrap();
        assert_eq!(
            rule,
            DependencyRule::PullBack {
                sibling: "Gstart".to_string(),
                gap: 2
            }
        );
    }
}
