//! Shared foundation: container tree, error model, derived context, version
//! handling, and the validation primitives used by every stage.

pub mod container;
pub mod context;
pub mod error;
pub mod primitives;
pub mod snapshot;
pub mod version;
