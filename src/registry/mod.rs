//! Field and model registries.

mod fields;
mod models;

pub use fields::FieldSet;
pub use models::{slugify, ModelRegistry, NavigationEntry};
