//! The v3 pipeline: RNA+ADT+CRISPR with per-modality stage names and a
//! `_metadata` group.

use crate::core::container::GroupNode;
use crate::core::context::{DerivedContext, Modality};
use crate::core::error::Result;
use crate::core::version::{FormatVersion, PipelineVariant};
use crate::stages::{
    batch_correction, cell_filtering, cell_labelling, combine_embeddings, custom_selections,
    feature_selection, inputs, marker_detection, metadata, normalization, pca, quality_control,
    snn_graph_cluster,
};

pub fn validate(state: &GroupNode, embedded: bool, version: FormatVersion) -> Result<()> {
    metadata::validate(state, version)?;

    let mut ctx = DerivedContext::new();

    let summary = inputs::validate(state, embedded, PipelineVariant::V3)?;
    ctx.num_cells = summary.num_cells;
    ctx.num_blocks = summary.num_blocks;
    ctx.feature_counts = summary.feature_counts;

    for (stage_name, descriptor) in [
        ("rna_quality_control", &quality_control::RNA_QC),
        ("adt_quality_control", &quality_control::ADT_QC),
        ("crispr_quality_control", &quality_control::CRISPR_QC),
    ] {
        let remaining = quality_control::validate(
            state,
            stage_name,
            descriptor,
            ctx.is_in_use(descriptor.modality),
            ctx.num_cells,
            ctx.num_blocks,
        )?;
        ctx.qc_remaining.insert(descriptor.modality, remaining);
    }

    ctx.filtered_cells = cell_filtering::validate(state, &ctx, PipelineVariant::V3)?;

    for (stage_name, modality) in [
        ("rna_normalization", Modality::Rna),
        ("adt_normalization", Modality::Adt),
        ("crispr_normalization", Modality::Crispr),
    ] {
        normalization::validate(state, stage_name, ctx.is_in_use(modality), ctx.filtered_cells)?;
    }

    let num_genes = ctx.feature_count(Modality::Rna).unwrap_or(0);
    feature_selection::validate(state, ctx.is_in_use(Modality::Rna), num_genes)?;

    for (stage_name, modality) in [
        ("rna_pca", Modality::Rna),
        ("adt_pca", Modality::Adt),
        ("crispr_pca", Modality::Crispr),
    ] {
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

    ctx.total_dims = combine_embeddings::validate(state, &ctx, PipelineVariant::V3)?;
    batch_correction::validate(state, ctx.num_blocks, ctx.filtered_cells, ctx.total_dims)?;

    super::validate_clustering_block(
        state,
        &mut ctx,
        &snn_graph_cluster::SnnGraphOptions {
            has_algorithm_choice: true,
        },
    )?;

    marker_detection::validate(
        state,
        &ctx,
        &marker_detection::MarkerOptions {
            per_modality_layout: true,
        },
    )?;
    custom_selections::validate(
        state,
        &ctx,
        &custom_selections::SelectionOptions {
            per_modality_layout: true,
        },
    )?;
    cell_labelling::validate(state, ctx.num_clusters)?;

    Ok(())
}
