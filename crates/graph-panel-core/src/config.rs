//! Page-level configuration embedded as JSON in the host page.

use serde::Deserialize;

use crate::schema::ParameterSchema;

/// Element id of the `<script type="application/json">` carrying the config.
pub const CONFIG_ELEMENT_ID: &str = "graph-panel-config";

/// Error type for page configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed page configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where graph panels live on the page and how they behave.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Selector for graph containers; each holds one image and one controls region.
    pub container_selector: String,
    /// Selector for the graph image, relative to its container.
    pub image_selector: String,
    /// Selector for the controls region, relative to its container.
    pub controls_selector: String,
    /// `EnvFilter` directive for browser console logging.
    pub log_filter: String,
    /// Apply `location.hash` parameters to every graph and track `hashchange`.
    pub follow_hash: bool,
    /// Overrides the standard schema when present.
    pub schema: Option<ParameterSchema>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            container_selector: "div.GraphPanel".to_string(),
            image_selector: "img".to_string(),
            controls_selector: "div.GraphControls".to_string(),
            log_filter: "info".to_string(),
            follow_hash: true,
            schema: None,
        }
    }
}

impl PageConfig {
    /// Parses the embedded JSON. Blank text yields the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    /// The schema to build panels from.
    pub fn schema(&self) -> ParameterSchema {
        self.schema.clone().unwrap_or_else(ParameterSchema::standard)
    }
}
