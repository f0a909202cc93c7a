//! medkb-common — Canonical entity schema, errors, and the sandboxed HTTP
//! client shared by the medkb crates.

pub mod error;
pub mod entities;
pub mod confidence;
pub mod sandbox;

// Re-export commonly used types
pub use entities::{EntityType, MedicalEntity, Severity, SourceMetadata};
pub use error::{MedkbError, Result};
