//! The `tsne` and `umap` visualization stages.

use crate::core::container::{open_typed_dataset, DataType, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::{check_bool_flag, check_positive_float, check_positive_integer};

pub fn validate_tsne(state: &GroupNode, filtered_cells: usize) -> Result<()> {
    let stage = super::open_stage(state, "tsne")?;
    let params = super::open_parameters(stage, "tsne")?;
    super::parameters_context(
        (|| {
            check_positive_float(params, "perplexity")?;
            check_positive_integer(params, "iterations")?;
            check_bool_flag(params, "animate")?;
            Ok(())
        })(),
        "tsne",
    )?;
    let results = super::open_results(stage, "tsne")?;
    super::results_context(check_coordinates(results, filtered_cells), "tsne")
}

pub fn validate_umap(state: &GroupNode, filtered_cells: usize) -> Result<()> {
    let stage = super::open_stage(state, "umap")?;
    let params = super::open_parameters(stage, "umap")?;
    super::parameters_context(
        (|| {
            check_positive_integer(params, "num_neighbors")?;
            check_positive_integer(params, "num_epochs")?;
            check_positive_float(params, "min_dist")?;
            check_bool_flag(params, "animate")?;
            Ok(())
        })(),
        "umap",
    )?;
    let results = super::open_results(stage, "umap")?;
    super::results_context(check_coordinates(results, filtered_cells), "umap")
}

fn check_coordinates(results: &GroupNode, filtered_cells: usize) -> Result<()> {
    open_typed_dataset(results, "x", DataType::Float, &[filtered_cells])?;
    open_typed_dataset(results, "y", DataType::Float, &[filtered_cells])?;
    Ok(())
}
