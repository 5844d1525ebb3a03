//! Hook revealing a panel while its container is hovered or focused.

use gloo::events::EventListener;
use web_sys::Element;
use yew::prelude::*;

const REVEAL_EVENTS: [(&str, bool); 4] = [
    ("mouseenter", true),
    ("focusin", true),
    ("mouseleave", false),
    ("focusout", false),
];

/// Returns whether `container` currently has the pointer or keyboard focus.
#[hook]
pub fn use_reveal(container: &Element) -> bool {
    let visible = use_state(|| false);

    {
        let visible = visible.clone();
        use_effect_with(container.clone(), move |container| {
            let listeners: Vec<EventListener> = REVEAL_EVENTS
                .iter()
                .map(|&(event, show)| {
                    let visible = visible.clone();
                    EventListener::new(container, event, move |_| visible.set(show))
                })
                .collect();

            move || drop(listeners)
        });
    }

    *visible
}
