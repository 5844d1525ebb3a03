//! UI components for the graph panels.

mod graph_panel;
mod parameter_control;

pub use graph_panel::{GraphPanel, GraphPanelProps};
pub use parameter_control::ParameterControl;
