//! Taxonomy graph: layered builder, document types and DOT backend.

pub mod builder;
pub mod dot;
pub mod types;

pub use builder::render;
pub use types::{GraphDocument, Style};
