//! The v2 pipeline: RNA plus optional ADT, with an explicit cell_filtering
//! stage and combined embeddings.

use crate::core::container::GroupNode;
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::Result;
use crate::core::version::PipelineVariant;
use crate::stages::{
    batch_correction, cell_filtering, cell_labelling, combine_embeddings, custom_selections,
    feature_selection, inputs, marker_detection, normalization, pca, quality_control,
    snn_graph_cluster,
};

pub fn validate(state: &GroupNode, embedded: bool) -> Result<()> {
    let mut ctx = DerivedContext::new();

    let summary = inputs::validate(state, embedded, PipelineVariant::V2)?;
    ctx.num_cells = summary.num_cells;
    ctx.num_blocks = summary.num_blocks;
    ctx.feature_counts = summary.feature_counts;

    let rna_remaining = quality_control::validate(
        state,
        "quality_control",
        &quality_control::RNA_QC,
        ctx.is_in_use(Modality::Rna),
        ctx.num_cells,
        ctx.num_blocks,
    )?;
    ctx.qc_remaining.insert(Modality::Rna, rna_remaining);

    let adt_remaining = quality_control::validate(
        state,
        "adt_quality_control",
        &quality_control::ADT_QC,
        ctx.is_in_use(Modality::Adt),
        ctx.num_cells,
        ctx.num_blocks,
    )?;
    ctx.qc_remaining.insert(Modality::Adt, adt_remaining);

    ctx.filtered_cells = cell_filtering::validate(state, &ctx, PipelineVariant::V2)?;

    normalization::validate(
        state,
        "normalization",
        ctx.is_in_use(Modality::Rna),
        ctx.filtered_cells,
    )?;
    normalization::validate(
        state,
        "adt_normalization",
        ctx.is_in_use(Modality::Adt),
        ctx.filtered_cells,
    )?;

    let num_genes = ctx.feature_count(Modality::Rna).unwrap_or(0);
    feature_selection::validate(state, ctx.is_in_use(Modality::Rna), num_genes)?;

    for (stage_name, modality) in [("pca", Modality::Rna), ("adt_pca", Modality::Adt)] {
        let observed = pca::validate(
            state,
            stage_name,
            &pca::PcaOptions {
                modality,
                block_methods: pca::BLOCK_METHODS,
            },
            ctx.is_in_use(modality),
            ctx.filtered_cells,
        )?;
        if let Some(n) = observed {
            ctx.observed_pcs.insert(modality, n);
        }
    }

    ctx.total_dims = combine_embeddings::validate(state, &ctx, PipelineVariant::V2)?;
    batch_correction::validate(state, ctx.num_blocks, ctx.filtered_cells, ctx.total_dims)?;

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
