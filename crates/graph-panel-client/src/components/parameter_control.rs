//! A single parameter widget.

use graph_panel_core::{Control, ControlKind, ControlValue};
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Properties for the ParameterControl component.
#[derive(Properties, PartialEq)]
pub struct ParameterControlProps {
    pub control: Control,
    /// Emits `(parameter name, new value)` on every change event.
    pub on_change: Callback<(String, ControlValue)>,
}

/// Renders one control as an input, checkbox or select.
#[function_component(ParameterControl)]
pub fn parameter_control(props: &ParameterControlProps) -> Html {
    let node = use_node_ref();

    // Constraints are advisory attributes such as min/max
    {
        let node = node.clone();
        use_effect_with(props.control.constraints().to_vec(), move |constraints| {
            if let Some(element) = node.cast::<Element>() {
                for (attribute, value) in constraints {
                    if let Err(err) = element.set_attribute(attribute, value) {
                        tracing::warn!(%attribute, "Failed to apply constraint: {err:?}");
                    }
                }
            }
            || ()
        });
    }

    let control = &props.control;
    let name = control.name().to_string();
    let kind = control.kind();

    let onchange = {
        let on_change = props.on_change.clone();
        let name = name.clone();
        Callback::from(move |e: Event| {
            let value = match kind {
                ControlKind::Checkbox => {
                    ControlValue::Checked(e.target_unchecked_into::<HtmlInputElement>().checked())
                }
                ControlKind::Select => {
                    ControlValue::Text(e.target_unchecked_into::<HtmlSelectElement>().value())
                }
                ControlKind::Text | ControlKind::Numeric => {
                    ControlValue::Text(e.target_unchecked_into::<HtmlInputElement>().value())
                }
            };
            on_change.emit((name.clone(), value));
        })
    };

    let field = match kind {
        ControlKind::Checkbox => html! {
            <input
                ref={node}
                type="checkbox"
                name={name}
                checked={control.value().is_checked()}
                {onchange}
            />
        },
        ControlKind::Select => {
            let current = control.value().as_text().unwrap_or_default();
            html! {
                <select ref={node} name={name} {onchange}>
                    { for control.options().iter().map(|option| html! {
                        <option value={option.value.clone()} selected={option.value == current}>
                            { option.label.clone() }
                        </option>
                    }) }
                </select>
            }
        }
        ControlKind::Text | ControlKind::Numeric => html! {
            <input
                ref={node}
                type={kind.input_type().unwrap_or("text")}
                name={name}
                value={control.value().as_text().unwrap_or_default().to_string()}
                {onchange}
            />
        },
    };

    html! {
        <label class={classes!("graph-control", format!("graph-control-{kind}"))}>
            <span class="graph-control-label">{ control.label() }</span>
            { field }
        </label>
    }
}
