//! The `custom_selections` stage: user-defined cell sets and their marker
//! statistics.

use crate::core::container::{
    load_integer_vector, open_group, open_typed_dataset, DataType, GroupNode, Node,
};
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::{ErrorKind, Result, ResultExt};
use crate::core::primitives::{
    check_bool_flag, check_nonnegative_float, check_sorted_unique,
};
use rustc_hash::FxHashSet;

const STAGE: &str = "custom_selections";
const STATS: [&str; 6] = ["means", "detected", "lfc", "delta_detected", "cohen", "auc"];

/// Version-resolved options, supplied by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct SelectionOptions {
    /// v3 carries `compute_auc`/`lfc_threshold` and a per-modality layout.
    pub per_modality_layout: bool,
}

pub fn validate(state: &GroupNode, ctx: &DerivedContext, options: &SelectionOptions) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let (names, compute_auc) =
        super::parameters_context(validate_parameters(params, ctx, options), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(
        validate_results(results, ctx, options, &names, compute_auc),
        STAGE,
    )
}

fn validate_parameters(
    params: &GroupNode,
    ctx: &DerivedContext,
    options: &SelectionOptions,
) -> Result<(FxHashSet<String>, bool)> {
    let compute_auc = if options.per_modality_layout {
        check_nonnegative_float(params, "lfc_threshold")?;
        check_bool_flag(params, "compute_auc")?
    } else {
        true
    };

    let selections = open_group(params, "selections")?;
    let mut names = FxHashSet::default();
    for name in selections.child_names() {
        let indices = load_integer_vector(selections, name, None)
            .with_context(|| format!("failed to check selection '{}'", name))?;
        if indices
            .iter()
            .any(|&i| i < 0 || i as usize >= ctx.filtered_cells)
        {
            return Err(ErrorKind::OutOfRange {
                field: name.to_string(),
                reason: "selection indices must lie within the filtered cell range".to_string(),
            }
            .into());
        }
        if !check_sorted_unique(indices) {
            return Err(ErrorKind::NotSortedUnique {
                field: name.to_string(),
            }
            .into());
        }
        names.insert(name.to_string());
    }
    Ok((names, compute_auc))
}

fn validate_results(
    results: &GroupNode,
    ctx: &DerivedContext,
    options: &SelectionOptions,
    names: &FxHashSet<String>,
    compute_auc: bool,
) -> Result<()> {
    let per_selection = open_group(results, "per_selection")?;

    if options.per_modality_layout {
        for modality in ctx.modalities_in_use() {
            let num_features = ctx.feature_count(modality).unwrap_or(0);
            let modality_group = open_group(per_selection, modality.name())?;
            validate_selection_set(modality_group, names, num_features, compute_auc)
                .with_context(|| {
                    format!(
                        "failed to check selections for the {} modality",
                        modality.name()
                    )
                })?;
        }
    } else {
        let num_features = ctx.feature_count(Modality::Rna).unwrap_or(0);
        validate_selection_set(per_selection, names, num_features, compute_auc)?;
    }
    Ok(())
}

/// Every declared selection must have statistics; no undeclared children.
fn validate_selection_set(
    parent: &GroupNode,
    names: &FxHashSet<String>,
    num_features: usize,
    compute_auc: bool,
) -> Result<()> {
    for child in parent.child_names() {
        if !names.contains(child) {
            return Err(ErrorKind::InconsistentCount(format!(
                "selection '{}' has results but was not declared in the parameters",
                child
            ))
            .into());
        }
    }
    for name in names {
        let group = match parent.get(name) {
            Some(Node::Group(g)) => g,
            _ => return Err(ErrorKind::MissingGroup(name.clone()).into()),
        };
        for stat in STATS {
            if stat == "auc" && !compute_auc {
                continue;
            }
            open_typed_dataset(group, stat, DataType::Float, &[num_features])
                .with_context(|| format!("failed to check selection '{}'", name))?;
        }
    }
    Ok(())
}
