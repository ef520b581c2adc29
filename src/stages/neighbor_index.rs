//! The `neighbor_index` stage: a parameters-only placeholder.

use crate::core::container::GroupNode;
use crate::core::error::Result;
use crate::core::primitives::check_bool_flag;

const STAGE: &str = "neighbor_index";

pub fn validate(state: &GroupNode) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    super::parameters_context(check_bool_flag(params, "approximate").map(|_| ()), STAGE)?;
    super::open_results(stage, STAGE)?;
    Ok(())
}
