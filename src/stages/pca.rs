//! Per-modality PCA stages.

use crate::core::container::{
    load_string_scalar, open_dataset, open_typed_dataset, DataType, GroupNode,
};
use crate::core::context::Modality;
use crate::core::error::{ErrorKind, Result};
use crate::core::primitives::{check_enum, check_pca_results, check_positive_integer};

/// Version-resolved options, supplied by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct PcaOptions {
    pub modality: Modality,
    /// Allowed `block_method` values for this format generation.
    pub block_methods: &'static [&'static str],
}

/// `block_method` sets per generation: `mnn` is legacy (pre-2.0), `weight`
/// replaced it from 2.0 onward.
pub const LEGACY_BLOCK_METHODS: &[&str] = &["none", "regress", "mnn"];
pub const BLOCK_METHODS: &[&str] = &["none", "regress", "weight"];

/// Returns the observed number of components, or `None` when the modality is
/// not in use.
pub fn validate(
    state: &GroupNode,
    stage_name: &str,
    options: &PcaOptions,
    in_use: bool,
    filtered_cells: usize,
) -> Result<Option<usize>> {
    let stage = super::open_stage(state, stage_name)?;
    let params = super::open_parameters(stage, stage_name)?;
    let num_pcs = super::parameters_context(validate_parameters(params, options), stage_name)?;
    let results = super::open_results(stage, stage_name)?;
    super::results_context(
        validate_results(results, num_pcs, in_use, filtered_cells),
        stage_name,
    )
}

fn validate_parameters(params: &GroupNode, options: &PcaOptions) -> Result<usize> {
    let num_pcs = check_positive_integer(params, "num_pcs")? as usize;
    if options.modality == Modality::Rna {
        check_positive_integer(params, "num_hvgs")?;
    }
    let method = load_string_scalar(params, "block_method")?;
    check_enum(&method, options.block_methods, "block_method")?;
    Ok(num_pcs)
}

fn validate_results(
    results: &GroupNode,
    num_pcs: usize,
    in_use: bool,
    filtered_cells: usize,
) -> Result<Option<usize>> {
    // Each piece present in an inactive stage is still fully validated.
    let mut observed = None;
    if in_use || results.contains("var_exp") || results.contains("pcs") {
        observed = Some(check_pca_results(results, num_pcs, filtered_cells)?);
    }

    // Legacy MNN-corrected coordinates; validated whenever present. Without
    // an accompanying component count only the row extent is pinned.
    if results.contains("corrected") {
        match observed {
            Some(n) => {
                open_typed_dataset(results, "corrected", DataType::Float, &[filtered_cells, n])?;
            }
            None => {
                let ds = open_dataset(results, "corrected")?;
                if ds.dtype != DataType::Float {
                    return Err(ErrorKind::WrongType {
                        name: "corrected".to_string(),
                        expected: DataType::Float.name().to_string(),
                    }
                    .into());
                }
                if ds.shape.len() != 2 || ds.shape[0] != filtered_cells {
                    return Err(ErrorKind::WrongShape {
                        name: "corrected".to_string(),
                    }
                    .into());
                }
            }
        }
    }

    Ok(if in_use { observed } else { None })
}
