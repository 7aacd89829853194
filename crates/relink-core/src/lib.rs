//! Reference-resolution engine.
//!
//! Normalization runs in two phases:
//!
//! 1. **Build**: every configured collection registers its slug-source
//!    values in a [`SlugRegistry`], and each record gets its own `slug`.
//!    Configured [`Aggregation`](relink_model::Aggregation)s then
//!    synthesize inverse relationship fields.
//! 2. **Project**: each record is restricted to its schema's kept fields,
//!    with reference fields replaced by resolved slugs.
//!
//! Projection borrows the finished registry, so no lookup can observe a
//! partially built one.

pub mod aggregate;
pub mod cell;
pub mod normalize;
pub mod project;
pub mod registry;
pub mod slug;

pub use aggregate::{aggregate, apply_aggregation};
pub use cell::parse_multi_value;
pub use normalize::{NormalizeOutput, Normalizer, OutputTable};
pub use project::{ResolutionStats, project, project_with_stats};
pub use registry::{Resolution, SlugRegistry, build_registry};
pub use slug::slugify;
