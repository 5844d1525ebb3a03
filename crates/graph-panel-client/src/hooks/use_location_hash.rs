//! Hook following `location.hash` parameters.

use gloo::events::EventListener;
use yew::prelude::*;

/// Calls `apply` with the current location hash once on mount and again on
/// every `hashchange`, while `enabled` is set.
#[hook]
pub fn use_location_hash<F>(enabled: bool, apply: F)
where
    F: Fn(&str) + 'static,
{
    use_effect_with(enabled, move |&enabled| {
        let listener = enabled.then(|| {
            let window = gloo::utils::window();
            let read_and_apply = move || {
                let hash = gloo::utils::window().location().hash().unwrap_or_default();
                apply(&hash);
            };
            read_and_apply();
            EventListener::new(&window, "hashchange", move |_| read_and_apply())
        });

        move || drop(listener)
    });
}
