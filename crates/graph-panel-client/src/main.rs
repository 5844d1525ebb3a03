//! Graph Panel Client
//!
//! Attaches a parameter panel to every graph container on the page.
//!
//! This crate is WASM-only. Use `trunk build` or `cargo check --target wasm32-unknown-unknown`.

#[cfg(not(target_arch = "wasm32"))]
compile_error!(
    "graph-panel-client only supports wasm32 target. Use: cargo check -p graph-panel-client --target wasm32-unknown-unknown"
);

mod components;
mod hooks;
mod mount;
mod target;

use gloo::events::EventListener;
use graph_panel_core::{CONFIG_ELEMENT_ID, ConfigError, PageConfig};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

const DEFAULT_LOG_FILTER: &str = "info";

fn main() {
    console_error_panic_hook::set_once();

    let loaded = read_page_config();
    init_tracing(
        loaded
            .as_ref()
            .map_or(DEFAULT_LOG_FILTER, |config| config.log_filter.as_str()),
    );
    let config = loaded.unwrap_or_else(|err| {
        tracing::warn!("{err}; using defaults");
        PageConfig::default()
    });

    // Panels are sized from rendered images, so wait for the page to finish loading.
    if gloo::utils::document().ready_state() == "complete" {
        start(&config);
    } else {
        EventListener::once(&gloo::utils::window(), "load", move |_| start(&config)).forget();
    }
}

fn start(config: &PageConfig) {
    if let Err(err) = mount::mount_all(config) {
        tracing::error!("Failed to attach graph panels: {err}");
    }
}

fn read_page_config() -> Result<PageConfig, ConfigError> {
    let text = gloo::utils::document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .unwrap_or_default();
    PageConfig::from_json(&text)
}

fn init_tracing(directives: &str) {
    let filter =
        EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
