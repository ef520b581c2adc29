//! The `feature_selection` stage: per-gene trend-fit statistics.

use crate::core::container::{open_typed_dataset, DataType, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::check_unit_interval;

const STAGE: &str = "feature_selection";
const STATS: [&str; 4] = ["means", "vars", "fitted", "resids"];

pub fn validate(state: &GroupNode, rna_in_use: bool, num_genes: usize) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    super::parameters_context(check_unit_interval(params, "span", false).map(|_| ()), STAGE)?;

    // When inactive, each statistic present is still checked individually.
    let results = super::open_results(stage, STAGE)?;
    super::results_context(
        (|| {
            for stat in STATS {
                if rna_in_use || results.contains(stat) {
                    open_typed_dataset(results, stat, DataType::Float, &[num_genes])?;
                }
            }
            Ok(())
        })(),
        STAGE,
    )
}
