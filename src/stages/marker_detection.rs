//! The `marker_detection` stage: per-cluster marker statistics.

use crate::core::container::{open_group, open_typed_dataset, DataType, GroupNode};
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::{ErrorKind, Result, ResultExt};
use crate::core::primitives::{check_bool_flag, check_nonnegative_float};

const STAGE: &str = "marker_detection";
const EFFECTS: [&str; 4] = ["lfc", "delta_detected", "cohen", "auc"];
const EFFECT_SUMMARIES: [&str; 3] = ["mean", "min", "min_rank"];

/// Version-resolved options, supplied by the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct MarkerOptions {
    /// v3 carries `compute_auc`/`lfc_threshold` parameters and a per-modality
    /// results layout.
    pub per_modality_layout: bool,
}

pub fn validate(state: &GroupNode, ctx: &DerivedContext, options: &MarkerOptions) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let compute_auc =
        super::parameters_context(validate_parameters(params, options), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(
        validate_results(results, ctx, options, compute_auc),
        STAGE,
    )
}

/// Returns whether AUC statistics are expected.
fn validate_parameters(params: &GroupNode, options: &MarkerOptions) -> Result<bool> {
    if !options.per_modality_layout {
        return Ok(true);
    }
    check_nonnegative_float(params, "lfc_threshold")?;
    check_bool_flag(params, "compute_auc")
}

fn validate_results(
    results: &GroupNode,
    ctx: &DerivedContext,
    options: &MarkerOptions,
    compute_auc: bool,
) -> Result<()> {
    if options.per_modality_layout {
        let per_cluster = open_group(results, "per_cluster")?;
        for modality in ctx.modalities_in_use() {
            let num_features = ctx.feature_count(modality).unwrap_or(0);
            let modality_group = open_group(per_cluster, modality.name())?;
            validate_cluster_set(modality_group, ctx.num_clusters, num_features, compute_auc)
                .with_context(|| format!("failed to check markers for the {} modality", modality.name()))?;
        }
    } else {
        let clusters = open_group(results, "clusters")?;
        let num_features = ctx.feature_count(Modality::Rna).unwrap_or(0);
        validate_cluster_set(clusters, ctx.num_clusters, num_features, compute_auc)?;
    }
    Ok(())
}

/// Checks one subgroup per cluster index, named `0..nclusters-1`.
fn validate_cluster_set(
    parent: &GroupNode,
    nclusters: usize,
    num_features: usize,
    compute_auc: bool,
) -> Result<()> {
    if parent.len() != nclusters {
        return Err(ErrorKind::InconsistentCount(format!(
            "expected {} cluster subgroups, found {}",
            nclusters,
            parent.len()
        ))
        .into());
    }
    for cluster in 0..nclusters {
        let name = cluster.to_string();
        let group = open_group(parent, &name)
            .with_context(|| format!("failed to check markers for cluster {}", cluster))?;
        validate_cluster_markers(group, num_features, compute_auc)
            .with_context(|| format!("failed to check markers for cluster {}", cluster))?;
    }
    Ok(())
}

fn validate_cluster_markers(
    group: &GroupNode,
    num_features: usize,
    compute_auc: bool,
) -> Result<()> {
    open_typed_dataset(group, "means", DataType::Float, &[num_features])?;
    open_typed_dataset(group, "detected", DataType::Float, &[num_features])?;
    for effect in EFFECTS {
        if effect == "auc" && !compute_auc {
            continue;
        }
        let effect_group = open_group(group, effect)?;
        for summary in EFFECT_SUMMARIES {
            open_typed_dataset(effect_group, summary, DataType::Float, &[num_features])?;
        }
    }
    Ok(())
}
