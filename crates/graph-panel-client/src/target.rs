//! Graph image bindings.

use graph_panel_core::GraphTarget;
use web_sys::{HtmlElement, HtmlImageElement};

/// The graph image as the target of a panel's URL rewrites.
///
/// Reads and writes the raw `src` attribute so relative URLs stay relative.
pub struct ImageTarget {
    image: HtmlImageElement,
}

impl ImageTarget {
    pub fn new(image: HtmlImageElement) -> Self {
        Self { image }
    }
}

impl GraphTarget for ImageTarget {
    fn url(&self) -> String {
        self.image.get_attribute("src").unwrap_or_default()
    }

    fn set_url(&mut self, url: &str) {
        if let Err(err) = self.image.set_attribute("src", url) {
            tracing::warn!("Failed to update graph image: {err:?}");
        }
    }
}

/// Rendered box of the graph image, in CSS pixels relative to its offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl OverlayGeometry {
    pub fn measure(image: &HtmlImageElement) -> Self {
        Self {
            left: image.offset_left(),
            top: image.offset_top(),
            width: image.width(),
            height: image.height(),
        }
    }

    /// Lays `region` over the image and shows or hides it.
    pub fn apply(&self, region: &HtmlElement, visible: bool) {
        let style = region.style();
        let properties = [
            ("position", "absolute".to_string()),
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
            ("width", format!("{}px", self.width)),
            ("max-height", format!("{}px", self.height)),
            ("overflow", "auto".to_string()),
            ("display", if visible { "block" } else { "none" }.to_string()),
        ];
        for (property, value) in properties {
            if let Err(err) = style.set_property(property, &value) {
                tracing::warn!(property, "Failed to position graph controls: {err:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn image(src: &str) -> HtmlImageElement {
        let image = gloo::utils::document()
            .create_element("img")
            .unwrap()
            .dyn_into::<HtmlImageElement>()
            .unwrap();
        image.set_attribute("src", src).unwrap();
        image
    }

    #[wasm_bindgen_test]
    fn test_target_keeps_relative_src() {
        let mut target = ImageTarget::new(image("graph.png?Gstart=0"));
        assert_eq!(target.url(), "graph.png?Gstart=0");

        target.set_url("graph.png?Gstart=4");
        assert_eq!(target.url(), "graph.png?Gstart=4");
    }

    #[wasm_bindgen_test]
    fn test_hidden_overlay() {
        let region = gloo::utils::document()
            .create_element("div")
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        let geometry = OverlayGeometry {
            left: 4,
            top: 8,
            width: 300,
            height: 120,
        };

        geometry.apply(&region, false);
        let style = region.style();
        assert_eq!(style.get_property_value("display").unwrap(), "none");
        assert_eq!(style.get_property_value("width").unwrap(), "300px");

        geometry.apply(&region, true);
        assert_eq!(style.get_property_value("display").unwrap(), "block");
    }
}
