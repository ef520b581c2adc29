//! Version dispatchers: one ordered stage sequence per schema generation.
//!
//! All version-to-behavior mapping lives here. Each dispatcher wires the
//! stage validators together in the correct order and threads the
//! [`DerivedContext`](crate::core::context::DerivedContext) from each stage
//! into the next; it contains no validation logic of its own.

pub mod v1;
pub mod v2;
pub mod v3;

use crate::core::container::GroupNode;
use crate::core::context::{ClusteringMethod, DerivedContext};
use crate::core::error::Result;
use crate::stages::{choose_clustering, kmeans_cluster, neighbor_index, reductions, snn_graph_cluster};

/// The clustering block shared by every generation: neighbor index, method
/// choice, both clustering stages (mandatory only when chosen), and the
/// 2-D visualizations.
pub(crate) fn validate_clustering_block(
    state: &GroupNode,
    ctx: &mut DerivedContext,
    snn_options: &snn_graph_cluster::SnnGraphOptions,
) -> Result<()> {
    neighbor_index::validate(state)?;

    let method = choose_clustering::validate(state)?;
    ctx.clustering_method = Some(method);

    let kmeans_clusters = kmeans_cluster::validate(
        state,
        method == ClusteringMethod::Kmeans,
        ctx.filtered_cells,
    )?;
    let snn_clusters = snn_graph_cluster::validate(
        state,
        snn_options,
        method == ClusteringMethod::SnnGraph,
        ctx.filtered_cells,
    )?;
    ctx.num_clusters = match method {
        ClusteringMethod::Kmeans => kmeans_clusters,
        ClusteringMethod::SnnGraph => snn_clusters,
    };

    reductions::validate_tsne(state, ctx.filtered_cells)?;
    reductions::validate_umap(state, ctx.filtered_cells)?;
    Ok(())
}
