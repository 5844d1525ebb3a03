//! Per-graph panel controller.
//!
//! A [`PanelController`] owns the controls built for one graph and a
//! [`GraphTarget`] standing in for the graph image. Every change event runs
//! the changed parameter's dependency callback, then rewrites the target URL
//! with the parameter's emitted value. Siblings adjusted by the callback are
//! queued and run the same cycle afterwards, so one edit emits the edited
//! parameter's URL first and cascaded updates after it.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::control::{Control, ControlKind, ControlSet, ControlValue};
use crate::dependency::Cascade;
use crate::querystring;
use crate::schema::{ParameterSchema, SchemaError};

/// Upper bound on change cycles per control for one user edit.
const CASCADE_STEPS_PER_CONTROL: usize = 4;

/// The resource whose URL carries the panel's parameters.
pub trait GraphTarget {
    fn url(&self) -> String;
    fn set_url(&mut self, url: &str);
}

/// Error type for change events the panel cannot apply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Parameter '{name}' is a {kind} control and cannot hold that value")]
    KindMismatch { name: String, kind: ControlKind },
}

/// One URL assignment made while handling a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emission {
    pub parameter: String,
    pub url: String,
}

/// Controls of one graph plus the target they rewrite.
pub struct PanelController<T> {
    schema: Rc<ParameterSchema>,
    controls: ControlSet,
    failures: Vec<SchemaError>,
    target: T,
}

impl<T: GraphTarget> PanelController<T> {
    /// Builds one control per definition, in schema order.
    ///
    /// A definition that cannot be built is logged, recorded in
    /// [`failures`](Self::failures) and skipped; the remaining controls are
    /// still built. Controls start from the values already present in the
    /// target URL.
    pub fn new(schema: Rc<ParameterSchema>, target: T) -> Self {
        let mut controls = ControlSet::default();
        let mut failures = Vec::new();

        for definition in schema.definitions() {
            let built = Control::build(definition).and_then(|control| controls.push(control));
            if let Err(err) = built {
                tracing::warn!(parameter = %definition.name, "Skipping control: {err}");
                failures.push(err);
            }
        }

        let url = target.url();
        for control in controls.iter_mut() {
            if let Some(raw) = querystring::get(&url, control.name()) {
                if !control.seed_from_query(raw) {
                    tracing::warn!(parameter = %control.name(), value = raw, "graph url value not shown by control");
                }
            }
        }

        tracing::debug!(
            controls = controls.len(),
            failures = failures.len(),
            "panel initialized"
        );

        Self {
            schema,
            controls,
            failures,
            target,
        }
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    /// Schema errors recorded while building the controls.
    pub fn failures(&self) -> &[SchemaError] {
        &self.failures
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Applies a user edit of `name` and returns the URL assignments made.
    pub fn handle_change(
        &mut self,
        name: &str,
        value: ControlValue,
    ) -> Result<Vec<Emission>, PanelError> {
        let control = self
            .controls
            .get_mut(name)
            .ok_or_else(|| PanelError::UnknownParameter(name.to_string()))?;
        control.set_value(value)?;

        let limit = self.controls.len() * CASCADE_STEPS_PER_CONTROL;
        let mut pending = VecDeque::from([name.to_string()]);
        let mut emissions = Vec::new();

        while let Some(current) = pending.pop_front() {
            if emissions.len() >= limit {
                tracing::warn!(
                    parameter = name,
                    dropped = pending.len() + 1,
                    "dependency cascade did not settle"
                );
                break;
            }
            pending.extend(self.run_dependency(&current));
            emissions.push(self.emit(&current));
        }

        Ok(emissions)
    }

    /// Merges an `&`-joined parameter string (such as a location hash) into
    /// the target in a single assignment.
    ///
    /// Pairs already present with the same value are skipped. Controls named
    /// in `params` pick up the new values and run their dependency callbacks;
    /// siblings those callbacks adjust are written into the same URL. A value
    /// a control cannot show is left out so the URL never disagrees with the
    /// panel. Returns the new URL, or `None` when it did not change.
    pub fn apply_fragment(&mut self, params: &str) -> Option<String> {
        let current = self.target.url();
        let mut next = current.clone();
        let mut edited: Vec<String> = Vec::new();

        for (key, value) in querystring::pairs(params) {
            if querystring::get(&current, key) == Some(value) {
                continue;
            }
            if let Some(control) = self.controls.get_mut(key) {
                if !control.seed_from_query(value) {
                    tracing::warn!(parameter = key, value, "Ignoring fragment value the control cannot show");
                    continue;
                }
                if !edited.iter().any(|name| name == key) {
                    edited.push(key.to_string());
                }
            }
            next = querystring::merge(&next, key, value);
        }

        for name in self.settle(edited) {
            let value = self.controls.get(&name).map(Control::emitted).unwrap_or_default();
            next = querystring::merge(&next, &name, &value);
        }

        if next == current {
            return None;
        }
        self.target.set_url(&next);
        tracing::debug!(url = %next, "fragment applied");
        Some(next)
    }

    /// Restores every control's default and drops their keys from the URL.
    pub fn reset(&mut self) -> String {
        let mut url = self.target.url();
        for control in self.controls.iter_mut() {
            control.reset();
            url = querystring::remove(&url, control.name());
        }
        self.target.set_url(&url);
        url
    }

    /// Runs the dependency callbacks of `edited` and of every sibling they
    /// adjust, without touching the target. Returns the adjusted siblings in
    /// order of first adjustment.
    fn settle(&mut self, edited: Vec<String>) -> Vec<String> {
        let limit = self.controls.len() * CASCADE_STEPS_PER_CONTROL;
        let mut pending = VecDeque::from(edited);
        let mut adjusted: Vec<String> = Vec::new();
        let mut steps = 0;

        while let Some(current) = pending.pop_front() {
            if steps >= limit {
                tracing::warn!(dropped = pending.len() + 1, "dependency cascade did not settle");
                break;
            }
            steps += 1;
            for raised in self.run_dependency(&current) {
                if !adjusted.contains(&raised) {
                    adjusted.push(raised.clone());
                }
                pending.push_back(raised);
            }
        }

        adjusted
    }

    /// Runs the dependency callback of `name`, returning the siblings it raised.
    fn run_dependency(&mut self, name: &str) -> Vec<String> {
        let Some(callback) = self.schema.callback(name).cloned() else {
            return Vec::new();
        };
        let mut cascade = Cascade::new(name, &mut self.controls);
        callback(&mut cascade);
        cascade.into_raised()
    }

    fn emit(&mut self, name: &str) -> Emission {
        let value = self
            .controls
            .get(name)
            .map(Control::emitted)
            .unwrap_or_default();
        let url = querystring::merge(&self.target.url(), name, &value);
        self.target.set_url(&url);
        tracing::debug!(parameter = name, %url, "graph url updated");
        Emission {
            parameter: name.to_string(),
            url,
        }
    }
}
