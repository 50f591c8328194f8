//! Rendering module for writing extracted catalogs.

mod json;
mod text;

pub use json::{from_json, to_json, value_to_json, JsonFormat};
pub use text::to_text;
