//! Discovery of graph containers and panel mounting.

use std::rc::Rc;

use gloo::events::EventListener;
use graph_panel_core::{PageConfig, ParameterSchema};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, HtmlImageElement};

use crate::components::{GraphPanel, GraphPanelProps};

/// Error type for graph containers that cannot host a panel.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    #[error("Invalid selector '{0}'")]
    Selector(String),
    #[error("Graph container {index} has no image matching '{selector}'")]
    MissingImage { index: u32, selector: String },
    #[error("Graph container {index} has no controls region matching '{selector}'")]
    MissingControls { index: u32, selector: String },
}

/// Mounts a panel on every graph container. Returns how many were found.
///
/// Containers missing their image or controls region are logged and skipped.
pub fn mount_all(config: &PageConfig) -> Result<u32, MountError> {
    let containers = gloo::utils::document()
        .query_selector_all(&config.container_selector)
        .map_err(|_| MountError::Selector(config.container_selector.clone()))?;
    let schema = Rc::new(config.schema());

    let mut found = 0;
    for index in 0..containers.length() {
        let Some(container) = containers
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        match GraphSite::discover(index, container, config) {
            Ok(site) => {
                site.mount_when_loaded(Rc::clone(&schema), config.follow_hash);
                found += 1;
            }
            Err(err) => tracing::warn!("{err}"),
        }
    }

    tracing::info!(panels = found, "graph panels attached");
    Ok(found)
}

/// The elements of one graph container.
struct GraphSite {
    container: Element,
    image: HtmlImageElement,
    region: HtmlElement,
}

impl GraphSite {
    fn discover(index: u32, container: Element, config: &PageConfig) -> Result<Self, MountError> {
        let image = find::<HtmlImageElement>(&container, &config.image_selector)?.ok_or_else(|| {
            MountError::MissingImage {
                index,
                selector: config.image_selector.clone(),
            }
        })?;
        let region = find::<HtmlElement>(&container, &config.controls_selector)?.ok_or_else(|| {
            MountError::MissingControls {
                index,
                selector: config.controls_selector.clone(),
            }
        })?;

        Ok(Self {
            container,
            image,
            region,
        })
    }

    /// Mounts now if the image has decoded, otherwise on its `load` event.
    fn mount_when_loaded(self, schema: Rc<ParameterSchema>, follow_hash: bool) {
        if self.image.complete() {
            self.mount(schema, follow_hash);
            return;
        }
        let image = self.image.clone();
        EventListener::once(&image, "load", move |_| self.mount(schema, follow_hash)).forget();
    }

    fn mount(self, schema: Rc<ParameterSchema>, follow_hash: bool) {
        let root: Element = self.region.clone().into();
        let props = GraphPanelProps {
            container: self.container,
            region: self.region,
            image: self.image,
            schema,
            follow_hash,
        };
        yew::Renderer::<GraphPanel>::with_root_and_props(root, props).render();
    }
}

fn find<T: JsCast>(container: &Element, selector: &str) -> Result<Option<T>, MountError> {
    let element = container
        .query_selector(selector)
        .map_err(|_| MountError::Selector(selector.to_string()))?;
    Ok(element.and_then(|element| element.dyn_into::<T>().ok()))
}
