//! The `batch_correction` stage.

use crate::core::container::{load_string_scalar, open_typed_dataset, DataType, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::{
    check_bool_flag, check_enum, check_optional_or_required, check_positive_integer,
};

const STAGE: &str = "batch_correction";

pub fn validate(
    state: &GroupNode,
    num_blocks: usize,
    filtered_cells: usize,
    total_dims: usize,
) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let method = super::parameters_context(validate_parameters(params), STAGE)?;

    // Corrected coordinates are only mandated when MNN actually ran, i.e.
    // more than one block.
    let required = method == "mnn" && num_blocks > 1;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(
        check_optional_or_required(results, "corrected", required, |r| {
            open_typed_dataset(r, "corrected", DataType::Float, &[filtered_cells, total_dims])?;
            Ok(())
        }),
        STAGE,
    )
}

fn validate_parameters(params: &GroupNode) -> Result<String> {
    check_positive_integer(params, "num_neighbors")?;
    check_bool_flag(params, "approximate")?;
    let method = load_string_scalar(params, "method")?;
    check_enum(&method, &["none", "mnn"], "method")?;
    Ok(method)
}
