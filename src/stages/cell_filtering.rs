//! The `cell_filtering` stage: merges per-modality QC discards into the final
//! filtered cell count.

use crate::core::container::GroupNode;
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::Result;
use crate::core::primitives::{check_bool_flag, check_discard_vector};
use crate::core::version::PipelineVariant;

const STAGE: &str = "cell_filtering";

/// Returns the post-filtering cell count.
pub fn validate(
    state: &GroupNode,
    ctx: &DerivedContext,
    variant: PipelineVariant,
) -> Result<usize> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let contributors =
        super::parameters_context(resolve_contributors(params, ctx, variant), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(validate_results(results, ctx, &contributors), STAGE)
}

/// The modalities whose QC discards feed the filter. v3 declares them with
/// explicit `use_*` flags; v2 infers them from which modalities produced a
/// QC remaining count.
fn resolve_contributors(
    params: &GroupNode,
    ctx: &DerivedContext,
    variant: PipelineVariant,
) -> Result<Vec<Modality>> {
    let mut contributors = Vec::new();
    match variant {
        PipelineVariant::V3 => {
            for (flag, modality) in [
                ("use_rna", Modality::Rna),
                ("use_adt", Modality::Adt),
                ("use_crispr", Modality::Crispr),
            ] {
                if check_bool_flag(params, flag)? && ctx.remaining(modality).is_some() {
                    contributors.push(modality);
                }
            }
        }
        _ => {
            for modality in Modality::ALL {
                if ctx.remaining(modality).is_some() {
                    contributors.push(modality);
                }
            }
        }
    }
    Ok(contributors)
}

fn validate_results(
    results: &GroupNode,
    ctx: &DerivedContext,
    contributors: &[Modality],
) -> Result<usize> {
    match contributors {
        // No QC contributions: every cell is retained, any present discard
        // vector is still validated structurally.
        [] => {
            if results.contains("discards") {
                check_discard_vector(results, ctx.num_cells)?;
            }
            Ok(ctx.num_cells)
        }
        // A single contributor's discard vector is reused directly.
        [only] => {
            if results.contains("discards") {
                check_discard_vector(results, ctx.num_cells)?;
            }
            Ok(ctx.remaining(*only).unwrap_or(ctx.num_cells))
        }
        // Multiple contributors require a merged discard vector.
        _ => check_discard_vector(results, ctx.num_cells),
    }
}
