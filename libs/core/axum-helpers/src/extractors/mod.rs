//! Custom extractors for Axum handlers.
//!
//! These standardize rejection bodies across the API: a failed extraction
//! responds with the same `{"error": ...}` shape every handler uses.

pub mod app_json;
pub mod uuid_path;

pub use app_json::AppJson;
pub use uuid_path::UuidPath;
