//! The `combine_embeddings` stage: merges per-modality PC matrices into one
//! embedding.

use crate::core::container::{
    load_float_scalar, open_group, open_typed_dataset, DataType, GroupNode,
};
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::{ErrorKind, Result};
use crate::core::primitives::{check_bool_flag, check_nonnegative_float, check_optional_or_required};
use crate::core::version::PipelineVariant;

const STAGE: &str = "combine_embeddings";

/// Returns the total dimensionality of the combined embedding.
pub fn validate(
    state: &GroupNode,
    ctx: &DerivedContext,
    variant: PipelineVariant,
) -> Result<usize> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let active = super::parameters_context(validate_parameters(params, ctx, variant), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(validate_results(results, ctx, &active), STAGE)
}

/// Resolves the active (in-use, nonzero-weight, PC-producing) modalities.
fn validate_parameters(
    params: &GroupNode,
    ctx: &DerivedContext,
    variant: PipelineVariant,
) -> Result<Vec<Modality>> {
    check_bool_flag(params, "approximate")?;

    let candidates: Vec<Modality> = Modality::ALL
        .iter()
        .copied()
        .filter(|m| ctx.pcs(*m).is_some())
        .collect();

    let mut active = Vec::new();
    match variant {
        PipelineVariant::V3 => {
            for modality in &candidates {
                let field = match modality {
                    Modality::Rna => "rna_weight",
                    Modality::Adt => "adt_weight",
                    Modality::Crispr => "crispr_weight",
                };
                if check_nonnegative_float(params, field)? > 0.0 {
                    active.push(*modality);
                }
            }
        }
        _ => {
            // v2 exposes an optional per-modality weight group; without it,
            // every PC-producing modality participates equally.
            if params.contains("weights") {
                let weights = open_group(params, "weights")?;
                for modality in &candidates {
                    let w = if weights.contains(modality.name()) {
                        let w = load_float_scalar(weights, modality.name())?;
                        if w < 0.0 {
                            return Err(ErrorKind::OutOfRange {
                                field: format!("weights/{}", modality.name()),
                                reason: format!("{} is negative", w),
                            }
                            .into());
                        }
                        w
                    } else {
                        1.0
                    };
                    if w > 0.0 {
                        active.push(*modality);
                    }
                }
            } else {
                active = candidates.clone();
            }
        }
    }

    if !candidates.is_empty() && active.is_empty() {
        return Err(ErrorKind::OutOfRange {
            field: "weights".to_string(),
            reason: "at least one modality must have a nonzero weight".to_string(),
        }
        .into());
    }
    Ok(active)
}

fn validate_results(
    results: &GroupNode,
    ctx: &DerivedContext,
    active: &[Modality],
) -> Result<usize> {
    let total_dims: usize = active.iter().filter_map(|m| ctx.pcs(*m)).sum();

    check_optional_or_required(results, "combined", active.len() > 1, |r| {
        open_typed_dataset(
            r,
            "combined",
            DataType::Float,
            &[ctx.filtered_cells, total_dims],
        )?;
        Ok(())
    })?;

    Ok(total_dims)
}
