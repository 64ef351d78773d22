//! Form configuration and layout generation.

mod config;
mod layout;

pub use config::{generate_form_config, group_title, humanize, FormConfig, FormField, FormGroup};
pub use layout::{generate_layout, FormLayout, LayoutGroup};
