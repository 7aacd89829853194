//! CLI library components for relink.

pub mod logging;
pub mod pipeline;
pub mod types;
