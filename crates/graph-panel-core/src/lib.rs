//! Graph Panel Core Library
//!
//! Parameter schema, control model and URL rewriting behind the graph
//! control panels. Platform independent: the browser client supplies the
//! image element through [`GraphTarget`].

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod control;
pub mod dependency;
pub mod panel;
pub mod querystring;
pub mod schema;

pub use config::{CONFIG_ELEMENT_ID, ConfigError, PageConfig};
pub use control::{Control, ControlKind, ControlSet, ControlValue};
pub use dependency::{Cascade, DependencyCallback, DependencyRule};
pub use panel::{Emission, GraphTarget, PanelController, PanelError};
pub use schema::{ParameterDefinition, ParameterSchema, SchemaError, SelectOption};
