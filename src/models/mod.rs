//! Data models for the admin core.
//!
//! Field and model descriptors plus the dynamic record type exchanged with
//! the backend.

mod field;
mod model;
mod record;

pub use field::*;
pub use model::*;
pub use record::*;
