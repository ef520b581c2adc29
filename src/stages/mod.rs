//! One validator per pipeline stage.
//!
//! Every stage follows the same contract: open its named top-level group,
//! validate `parameters`, validate `results` against the derived context so
//! far, and return the values downstream stages depend on. Version- and
//! modality-conditional behavior arrives pre-resolved from the dispatchers in
//! [`crate::versions`]; no stage inspects the format version directly.

pub mod batch_correction;
pub mod cell_filtering;
pub mod cell_labelling;
pub mod choose_clustering;
pub mod combine_embeddings;
pub mod custom_selections;
pub mod feature_selection;
pub mod inputs;
pub mod kmeans_cluster;
pub mod marker_detection;
pub mod metadata;
pub mod neighbor_index;
pub mod normalization;
pub mod pca;
pub mod quality_control;
pub mod reductions;
pub mod snn_graph_cluster;

use crate::core::container::{open_group, GroupNode};
use crate::core::error::{Result, ResultExt};

/// Opens a stage's top-level group.
pub(crate) fn open_stage<'a>(state: &'a GroupNode, name: &str) -> Result<&'a GroupNode> {
    open_group(state, name).with_context(|| format!("failed to find the '{}' stage", name))
}

/// Opens a stage's `parameters` subgroup with the standard breadcrumb.
pub(crate) fn open_parameters<'a>(stage: &'a GroupNode, name: &str) -> Result<&'a GroupNode> {
    open_group(stage, "parameters")
        .with_context(|| format!("failed to retrieve parameters from '{}'", name))
}

/// Opens a stage's `results` subgroup with the standard breadcrumb.
pub(crate) fn open_results<'a>(stage: &'a GroupNode, name: &str) -> Result<&'a GroupNode> {
    open_group(stage, "results")
        .with_context(|| format!("failed to retrieve results from '{}'", name))
}

/// Wraps a parameter sub-check with the standard breadcrumb.
pub(crate) fn parameters_context<T>(result: Result<T>, name: &str) -> Result<T> {
    result.with_context(|| format!("failed to retrieve parameters from '{}'", name))
}

/// Wraps a results sub-check with the standard breadcrumb.
pub(crate) fn results_context<T>(result: Result<T>, name: &str) -> Result<T> {
    result.with_context(|| format!("failed to retrieve results from '{}'", name))
}
