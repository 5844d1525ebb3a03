//! Graph panel component: the controls for one graph image.

use std::rc::Rc;

use graph_panel_core::{Control, ControlValue, PanelController, ParameterSchema};
use web_sys::{Element, HtmlElement, HtmlImageElement};
use yew::prelude::*;

use crate::components::ParameterControl;
use crate::hooks::{use_location_hash, use_reveal};
use crate::target::{ImageTarget, OverlayGeometry};

/// Props for the GraphPanel component.
#[derive(Properties, Clone)]
pub struct GraphPanelProps {
    /// Graph container; hovering or focusing it reveals the panel.
    pub container: Element,
    /// Controls region the panel is mounted into.
    pub region: HtmlElement,
    /// Graph image whose `src` the panel rewrites.
    pub image: HtmlImageElement,
    pub schema: Rc<ParameterSchema>,
    /// Apply `location.hash` parameters to this graph.
    #[prop_or(true)]
    pub follow_hash: bool,
}

impl PartialEq for GraphPanelProps {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
            && self.region == other.region
            && self.image == other.image
            && Rc::ptr_eq(&self.schema, &other.schema)
            && self.follow_hash == other.follow_hash
    }
}

/// Parameter panel bound to one graph image.
#[function_component(GraphPanel)]
pub fn graph_panel(props: &GraphPanelProps) -> Html {
    let controller = {
        let schema = Rc::clone(&props.schema);
        let image = props.image.clone();
        use_mut_ref(move || PanelController::new(schema, ImageTarget::new(image)))
    };
    let refresh = use_force_update();
    let visible = use_reveal(&props.container);

    // Re-measured on every toggle so the overlay follows image resizes
    {
        let region = props.region.clone();
        let image = props.image.clone();
        use_effect_with(visible, move |&visible| {
            OverlayGeometry::measure(&image).apply(&region, visible);
            || ()
        });
    }

    {
        let controller = controller.clone();
        let refresh = refresh.clone();
        use_location_hash(props.follow_hash, move |hash| {
            if controller.borrow_mut().apply_fragment(hash).is_some() {
                refresh.force_update();
            }
        });
    }

    let on_change = {
        let controller = controller.clone();
        let refresh = refresh.clone();
        Callback::from(move |(name, value): (String, ControlValue)| {
            let result = controller.borrow_mut().handle_change(&name, value);
            match result {
                Ok(emissions) => {
                    tracing::debug!(parameter = %name, emitted = emissions.len(), "control changed");
                }
                Err(err) => tracing::warn!("Ignoring change: {err}"),
            }
            refresh.force_update();
        })
    };

    let on_reset = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            let url = controller.borrow_mut().reset();
            tracing::debug!(%url, "panel reset");
            refresh.force_update();
        })
    };

    let controls: Vec<Control> = controller.borrow().controls().iter().cloned().collect();

    html! {
        <div class={classes!("graph-panel", visible.then_some("open"))}>
            { for controls.into_iter().map(|control| {
                let key = control.name().to_string();
                html! {
                    <ParameterControl key={key} control={control} on_change={on_change.clone()} />
                }
            }) }
            <button type="button" class="btn btn-reset" onclick={on_reset}>
                { "Reset" }
            </button>
        </div>
    }
}
