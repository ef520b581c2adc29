//! Per-modality normalization stages.

use crate::core::container::{open_typed_dataset, DataType, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::check_optional_or_required;

/// Parameters are an empty placeholder group; results carry `size_factors`
/// over the filtered cells, required only when the modality is in use.
pub fn validate(
    state: &GroupNode,
    stage_name: &str,
    in_use: bool,
    filtered_cells: usize,
) -> Result<()> {
    let stage = super::open_stage(state, stage_name)?;
    super::open_parameters(stage, stage_name)?;
    let results = super::open_results(stage, stage_name)?;
    super::results_context(
        check_optional_or_required(results, "size_factors", in_use, |r| {
            open_typed_dataset(r, "size_factors", DataType::Float, &[filtered_cells])?;
            Ok(())
        }),
        stage_name,
    )
}
