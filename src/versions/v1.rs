//! The legacy v1 pipeline: monolithic, RNA-only, no separate filtering stage.

use crate::core::container::GroupNode;
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::Result;
use crate::core::version::PipelineVariant;
use crate::stages::{
    cell_labelling, custom_selections, feature_selection, inputs, marker_detection, normalization,
    pca, quality_control, snn_graph_cluster,
};

pub fn validate(state: &GroupNode, embedded: bool) -> Result<()> {
    let mut ctx = DerivedContext::new();

    let summary = inputs::validate(state, embedded, PipelineVariant::V1)?;
    ctx.num_cells = summary.num_cells;
    ctx.num_blocks = summary.num_blocks;
    ctx.feature_counts = summary.feature_counts;

    let remaining = quality_control::validate(
        state,
        "quality_control",
        &quality_control::RNA_QC,
        true,
        ctx.num_cells,
        ctx.num_blocks,
    )?;
    ctx.qc_remaining.insert(Modality::Rna, remaining);
    // No cell_filtering stage in v1; QC discards are the filter.
    ctx.filtered_cells = remaining.unwrap_or(ctx.num_cells);

    normalization::validate(state, "normalization", true, ctx.filtered_cells)?;

    let num_genes = ctx.feature_count(Modality::Rna).unwrap_or(0);
    feature_selection::validate(state, true, num_genes)?;

    let observed = pca::validate(
        state,
        "pca",
        &pca::PcaOptions {
            modality: Modality::Rna,
            block_methods: pca::LEGACY_BLOCK_METHODS,
        },
        true,
        ctx.filtered_cells,
    )?;
    if let Some(n) = observed {
        ctx.observed_pcs.insert(Modality::Rna, n);
        ctx.total_dims = n;
    }

    super::validate_clustering_block(
        state,
        &mut ctx,
        &snn_graph_cluster::SnnGraphOptions {
            has_algorithm_choice: false,
        },
    )?;

    marker_detection::validate(
        state,
        &ctx,
        &marker_detection::MarkerOptions {
            per_modality_layout: false,
        },
    )?;
    custom_selections::validate(
        state,
        &ctx,
        &custom_selections::SelectionOptions {
            per_modality_layout: false,
        },
    )?;
    cell_labelling::validate(state, ctx.num_clusters)?;

    Ok(())
}
