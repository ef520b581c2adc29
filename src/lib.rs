//! kanacheck: schema validation for kana session analysis state.
//!
//! A kana session file embeds an HDF5 state describing a multi-stage
//! single-cell analysis (quality control, normalization, dimensionality
//! reduction, clustering, marker detection, and friends). This crate checks
//! that such a state conforms to its declared format version, across three
//! divergent generations:
//!
//! - **v1**: monolithic RNA-only layout.
//! - **v2**: multi-modal RNA+ADT with explicit cell filtering and combined
//!   embeddings.
//! - **v3**: multi-modal RNA+ADT+CRISPR with per-modality stage names and a
//!   `_metadata` group.
//!
//! Validation is structural: each stage's `parameters` and `results`
//! subtrees are checked for existence, type, shape, and cross-stage
//! consistency (a stage's expected array lengths depend on counts derived
//! from earlier stages), but numerical content is not re-derived.
//!
//! The container is an in-memory [`core::container::GroupNode`] tree; any
//! backend that can enumerate groups and typed datasets can materialize one
//! (an HDF5 reader, the JSON snapshot loader in [`core::snapshot`], or a
//! hand-built fixture).
//!
//! # Example
//!
//! ```
//! use kanacheck::core::container::{DatasetNode, GroupNode};
//!
//! let mut state = GroupNode::new();
//! let inputs = state.new_group("inputs");
//! inputs.new_group("parameters");
//! inputs.new_group("results");
//! // An incomplete state fails with a breadcrumb trail.
//! let err = kanacheck::validate(&state, false, 1_000_000).unwrap_err();
//! assert!(err.to_string().contains("inputs"));
//! let _ = DatasetNode::integer_scalar(0);
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: container tree, error model, derived context, versioning, and
//!   shared validation primitives
//! - [`stages`]: one validator per pipeline stage
//! - [`versions`]: the per-generation dispatchers threading derived values
//!   between stages

pub mod core;
pub mod stages;
pub mod versions;

use crate::core::container::GroupNode;
use crate::core::error::Result;
use crate::core::version::{FormatVersion, PipelineVariant};

pub use crate::core::error::{ErrorKind, ValidationError};

/// Validates an analysis state tree against the schema for `version`.
///
/// `version` uses the encoded form `major * 1_000_000 + minor * 1_000 +
/// patch` (so `2_000_000` is v2.0.0). `embedded` selects whether input file
/// records carry byte offsets (embedded payload) or external identifiers.
///
/// Returns `Ok(())` when the state is schema-valid; otherwise the error
/// carries the failure kind and a breadcrumb trail naming the stage and
/// sub-field on the way to the root cause.
pub fn validate(state: &GroupNode, embedded: bool, version: i64) -> Result<()> {
    let version = FormatVersion::from_encoded(version)?;
    match version.variant() {
        PipelineVariant::V1 => versions::v1::validate(state, embedded),
        PipelineVariant::V2 => versions::v2::validate(state, embedded),
        PipelineVariant::V3 => versions::v3::validate(state, embedded, version),
    }
}
