//! Data model for relink.
//!
//! Records and collections as loaded from spreadsheet exports, the
//! per-collection schemas that drive projection, and the configuration
//! those schemas are built from.

pub mod config;
pub mod error;
pub mod record;
pub mod schema;

pub use config::{Aggregation, EngineConfig, SchemaConfig};
pub use error::{ModelError, Result};
pub use record::{Collection, Record, SLUG_FIELD};
pub use schema::{FieldKind, ReferenceTargets, Schema, SchemaField};
