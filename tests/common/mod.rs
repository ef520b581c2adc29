//! Fixture builders: synthetic analysis states that are valid for each
//! format generation. Tests perturb these to probe individual checks.

use kanacheck::core::container::{DatasetNode, GroupNode, Node};

pub const NUM_CELLS: usize = 100;
pub const NUM_GENES: usize = 200;
pub const FILTERED_CELLS: usize = 90;
pub const NUM_PCS: usize = 10;
pub const NUM_CLUSTERS: usize = 5;

/// Ten discarded cells followed by ninety retained ones.
pub fn qc_discards() -> Vec<i64> {
    let mut d = vec![1i64; NUM_CELLS - FILTERED_CELLS];
    d.extend(vec![0i64; FILTERED_CELLS]);
    d
}

/// Cluster labels cycling through `[0, NUM_CLUSTERS)`.
pub fn cluster_labels() -> Vec<i64> {
    (0..FILTERED_CELLS as i64).map(|i| i % NUM_CLUSTERS as i64).collect()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// A stage group with the given `parameters` and `results` children.
pub fn stage(params: GroupNode, results: GroupNode) -> GroupNode {
    let mut g = GroupNode::new();
    g.insert_group("parameters", params);
    g.insert_group("results", results);
    g
}

/// Navigates to a nested group, panicking on a bad path. Test-only sugar for
/// perturbing fixtures.
pub fn group_at_mut<'a>(root: &'a mut GroupNode, path: &[&str]) -> &'a mut GroupNode {
    let mut current = root;
    for part in path {
        current = match current.get_mut(part) {
            Some(Node::Group(g)) => g,
            _ => panic!("fixture path component '{}' is not a group", part),
        };
    }
    current
}

fn inputs_stage(count_field: &str, v3_identities: bool) -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("format", DatasetNode::string_scalar("MatrixMarket"));
    let files = params.new_group("files");
    let record = files.new_group("0");
    record.insert_dataset("type", DatasetNode::string_scalar("mtx"));
    record.insert_dataset("name", DatasetNode::string_scalar("matrix.mtx.gz"));
    record.insert_dataset("id", DatasetNode::string_scalar("fileid-0"));

    let mut results = GroupNode::new();
    results.insert_dataset("num_cells", DatasetNode::integer_scalar(NUM_CELLS as i64));
    results.insert_dataset(count_field, DatasetNode::integer_scalar(1));
    let identities: Vec<i64> = (0..NUM_GENES as i64).collect();
    if v3_identities {
        let ids = results.new_group("identities");
        ids.insert_dataset("RNA", DatasetNode::integer_vector(identities));
    } else {
        results.insert_dataset("identities", DatasetNode::integer_vector(identities));
    }
    stage(params, results)
}

fn rna_qc_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("use_mito_default", DatasetNode::integer_scalar(1));
    params.insert_dataset("mito_prefix", DatasetNode::string_scalar("mt-"));
    params.insert_dataset("nmads", DatasetNode::float_scalar(3.0));

    let mut results = GroupNode::new();
    let metrics = results.new_group("metrics");
    metrics.insert_dataset("sums", DatasetNode::float_vector(vec![100.0; NUM_CELLS]));
    metrics.insert_dataset("detected", DatasetNode::integer_vector(vec![50; NUM_CELLS]));
    metrics.insert_dataset("proportion", DatasetNode::float_vector(vec![0.05; NUM_CELLS]));
    let thresholds = results.new_group("thresholds");
    thresholds.insert_dataset("sums", DatasetNode::float_vector(vec![10.0]));
    thresholds.insert_dataset("detected", DatasetNode::float_vector(vec![5.0]));
    thresholds.insert_dataset("proportion", DatasetNode::float_vector(vec![0.2]));
    results.insert_dataset("discards", DatasetNode::integer_vector(qc_discards()));
    stage(params, results)
}

fn adt_qc_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("igg_prefix", DatasetNode::string_scalar("IgG"));
    params.insert_dataset("nmads", DatasetNode::float_scalar(3.0));
    params.insert_dataset("min_detected_drop", DatasetNode::float_scalar(0.1));
    stage(params, GroupNode::new())
}

fn crispr_qc_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("nmads", DatasetNode::float_scalar(3.0));
    stage(params, GroupNode::new())
}

fn normalization_stage(with_size_factors: bool) -> GroupNode {
    let mut results = GroupNode::new();
    if with_size_factors {
        results.insert_dataset(
            "size_factors",
            DatasetNode::float_vector(vec![1.0; FILTERED_CELLS]),
        );
    }
    stage(GroupNode::new(), results)
}

fn feature_selection_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("span", DatasetNode::float_scalar(0.3));
    let mut results = GroupNode::new();
    for stat in ["means", "vars", "fitted", "resids"] {
        results.insert_dataset(stat, DatasetNode::float_vector(vec![0.5; NUM_GENES]));
    }
    stage(params, results)
}

fn pca_stage(rna: bool, in_use: bool) -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("num_pcs", DatasetNode::integer_scalar(NUM_PCS as i64));
    if rna {
        params.insert_dataset("num_hvgs", DatasetNode::integer_scalar(50));
    }
    params.insert_dataset("block_method", DatasetNode::string_scalar("none"));

    let mut results = GroupNode::new();
    if in_use {
        results.insert_dataset("var_exp", DatasetNode::float_vector(vec![0.1; NUM_PCS]));
        results.insert_dataset("pcs", DatasetNode::float_matrix(FILTERED_CELLS, NUM_PCS));
    }
    stage(params, results)
}

fn combine_embeddings_stage(v3: bool) -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("approximate", DatasetNode::integer_scalar(1));
    if v3 {
        params.insert_dataset("rna_weight", DatasetNode::float_scalar(1.0));
    }
    stage(params, GroupNode::new())
}

fn batch_correction_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("num_neighbors", DatasetNode::integer_scalar(15));
    params.insert_dataset("approximate", DatasetNode::integer_scalar(1));
    params.insert_dataset("method", DatasetNode::string_scalar("none"));
    stage(params, GroupNode::new())
}

fn neighbor_index_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("approximate", DatasetNode::integer_scalar(1));
    stage(params, GroupNode::new())
}

fn choose_clustering_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("method", DatasetNode::string_scalar("snn_graph"));
    stage(params, GroupNode::new())
}

fn kmeans_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("k", DatasetNode::integer_scalar(10));
    stage(params, GroupNode::new())
}

fn snn_graph_stage(v3: bool) -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("k", DatasetNode::integer_scalar(10));
    params.insert_dataset("scheme", DatasetNode::string_scalar("rank"));
    if v3 {
        params.insert_dataset("algorithm", DatasetNode::string_scalar("multilevel"));
        params.insert_dataset("multilevel_resolution", DatasetNode::float_scalar(1.0));
        params.insert_dataset("leiden_resolution", DatasetNode::float_scalar(1.0));
        params.insert_dataset("walktrap_steps", DatasetNode::integer_scalar(4));
    }
    let mut results = GroupNode::new();
    results.insert_dataset("clusters", DatasetNode::integer_vector(cluster_labels()));
    stage(params, results)
}

fn tsne_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("perplexity", DatasetNode::float_scalar(30.0));
    params.insert_dataset("iterations", DatasetNode::integer_scalar(500));
    params.insert_dataset("animate", DatasetNode::integer_scalar(0));
    stage(params, xy_results())
}

fn umap_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset("num_neighbors", DatasetNode::integer_scalar(15));
    params.insert_dataset("num_epochs", DatasetNode::integer_scalar(500));
    params.insert_dataset("min_dist", DatasetNode::float_scalar(0.1));
    params.insert_dataset("animate", DatasetNode::integer_scalar(0));
    stage(params, xy_results())
}

fn xy_results() -> GroupNode {
    let mut results = GroupNode::new();
    results.insert_dataset("x", DatasetNode::float_vector(vec![0.0; FILTERED_CELLS]));
    results.insert_dataset("y", DatasetNode::float_vector(vec![0.0; FILTERED_CELLS]));
    results
}

/// One cluster's marker statistics with all four effect groups.
pub fn marker_cluster_group(num_features: usize, with_auc: bool) -> GroupNode {
    let mut g = GroupNode::new();
    g.insert_dataset("means", DatasetNode::float_vector(vec![0.0; num_features]));
    g.insert_dataset("detected", DatasetNode::float_vector(vec![0.0; num_features]));
    for effect in ["lfc", "delta_detected", "cohen", "auc"] {
        if effect == "auc" && !with_auc {
            continue;
        }
        let eg = g.new_group(effect);
        for summary in ["mean", "min", "min_rank"] {
            eg.insert_dataset(summary, DatasetNode::float_vector(vec![0.0; num_features]));
        }
    }
    g
}

fn marker_detection_stage(v3: bool) -> GroupNode {
    let mut params = GroupNode::new();
    let mut results = GroupNode::new();
    if v3 {
        params.insert_dataset("compute_auc", DatasetNode::integer_scalar(1));
        params.insert_dataset("lfc_threshold", DatasetNode::float_scalar(0.0));
        let per_cluster = results.new_group("per_cluster");
        let rna = per_cluster.new_group("RNA");
        for cluster in 0..NUM_CLUSTERS {
            rna.insert_group(cluster.to_string(), marker_cluster_group(NUM_GENES, true));
        }
    } else {
        let clusters = results.new_group("clusters");
        for cluster in 0..NUM_CLUSTERS {
            clusters.insert_group(cluster.to_string(), marker_cluster_group(NUM_GENES, true));
        }
    }
    stage(params, results)
}

fn custom_selections_stage(v3: bool) -> GroupNode {
    let mut params = GroupNode::new();
    params.new_group("selections");
    if v3 {
        params.insert_dataset("compute_auc", DatasetNode::integer_scalar(1));
        params.insert_dataset("lfc_threshold", DatasetNode::float_scalar(0.0));
    }
    let mut results = GroupNode::new();
    let per_selection = results.new_group("per_selection");
    if v3 {
        per_selection.new_group("RNA");
    }
    stage(params, results)
}

fn cell_labelling_stage() -> GroupNode {
    let mut params = GroupNode::new();
    params.insert_dataset(
        "human_references",
        DatasetNode::string_vector(strings(&["BlueprintEncode"])),
    );
    params.insert_dataset(
        "mouse_references",
        DatasetNode::string_vector(strings(&["ImmGen"])),
    );
    let mut results = GroupNode::new();
    let per_reference = results.new_group("per_reference");
    per_reference.insert_dataset(
        "BlueprintEncode",
        DatasetNode::string_vector(vec!["T cell".to_string(); NUM_CLUSTERS]),
    );
    stage(params, results)
}

fn metadata_group(version: i64) -> GroupNode {
    let mut g = GroupNode::new();
    g.insert_dataset("format_version", DatasetNode::integer_scalar(version));
    g.insert_dataset("application_name", DatasetNode::string_scalar("kana"));
    g.insert_dataset("application_version", DatasetNode::string_scalar("3.0.0"));
    g
}

/// A complete valid v1 (RNA-only, linked files) analysis state.
pub fn v1_state() -> GroupNode {
    let mut state = GroupNode::new();
    state.insert_group("inputs", inputs_stage("num_samples", false));
    state.insert_group("quality_control", rna_qc_stage());
    state.insert_group("normalization", normalization_stage(true));
    state.insert_group("feature_selection", feature_selection_stage());
    state.insert_group("pca", pca_stage(true, true));
    state.insert_group("neighbor_index", neighbor_index_stage());
    state.insert_group("choose_clustering", choose_clustering_stage());
    state.insert_group("kmeans_cluster", kmeans_stage());
    state.insert_group("snn_graph_cluster", snn_graph_stage(false));
    state.insert_group("tsne", tsne_stage());
    state.insert_group("umap", umap_stage());
    state.insert_group("marker_detection", marker_detection_stage(false));
    state.insert_group("custom_selections", custom_selections_stage(false));
    state.insert_group("cell_labelling", cell_labelling_stage());
    state
}

/// A complete valid v2 (RNA in use, ADT stages present but inactive) state.
pub fn v2_state() -> GroupNode {
    let mut state = GroupNode::new();
    state.insert_group("inputs", inputs_stage("num_samples", false));
    state.insert_group("quality_control", rna_qc_stage());
    state.insert_group("adt_quality_control", adt_qc_stage());
    state.insert_group("cell_filtering", stage(GroupNode::new(), GroupNode::new()));
    state.insert_group("normalization", normalization_stage(true));
    state.insert_group("adt_normalization", normalization_stage(false));
    state.insert_group("feature_selection", feature_selection_stage());
    state.insert_group("pca", pca_stage(true, true));
    state.insert_group("adt_pca", pca_stage(false, false));
    state.insert_group("combine_embeddings", combine_embeddings_stage(false));
    state.insert_group("batch_correction", batch_correction_stage());
    state.insert_group("neighbor_index", neighbor_index_stage());
    state.insert_group("choose_clustering", choose_clustering_stage());
    state.insert_group("kmeans_cluster", kmeans_stage());
    state.insert_group("snn_graph_cluster", snn_graph_stage(false));
    state.insert_group("tsne", tsne_stage());
    state.insert_group("umap", umap_stage());
    state.insert_group("marker_detection", marker_detection_stage(false));
    state.insert_group("custom_selections", custom_selections_stage(false));
    state.insert_group("cell_labelling", cell_labelling_stage());
    state
}

/// A complete valid v3 (RNA in use, ADT/CRISPR stages present but inactive)
/// state, including `_metadata`.
pub fn v3_state() -> GroupNode {
    let mut state = GroupNode::new();
    state.insert_group("_metadata", metadata_group(3_000_000));
    state.insert_group("inputs", inputs_stage("num_blocks", true));
    state.insert_group("rna_quality_control", rna_qc_stage());
    state.insert_group("adt_quality_control", adt_qc_stage());
    state.insert_group("crispr_quality_control", crispr_qc_stage());
    let mut filtering_params = GroupNode::new();
    filtering_params.insert_dataset("use_rna", DatasetNode::integer_scalar(1));
    filtering_params.insert_dataset("use_adt", DatasetNode::integer_scalar(0));
    filtering_params.insert_dataset("use_crispr", DatasetNode::integer_scalar(0));
    state.insert_group("cell_filtering", stage(filtering_params, GroupNode::new()));
    state.insert_group("rna_normalization", normalization_stage(true));
    state.insert_group("adt_normalization", normalization_stage(false));
    state.insert_group("crispr_normalization", normalization_stage(false));
    state.insert_group("feature_selection", feature_selection_stage());
    state.insert_group("rna_pca", pca_stage(true, true));
    state.insert_group("adt_pca", pca_stage(false, false));
    state.insert_group("crispr_pca", pca_stage(false, false));
    state.insert_group("combine_embeddings", combine_embeddings_stage(true));
    state.insert_group("batch_correction", batch_correction_stage());
    state.insert_group("neighbor_index", neighbor_index_stage());
    state.insert_group("choose_clustering", choose_clustering_stage());
    state.insert_group("kmeans_cluster", kmeans_stage());
    state.insert_group("snn_graph_cluster", snn_graph_stage(true));
    state.insert_group("tsne", tsne_stage());
    state.insert_group("umap", umap_stage());
    state.insert_group("marker_detection", marker_detection_stage(true));
    state.insert_group("custom_selections", custom_selections_stage(true));
    state.insert_group("cell_labelling", cell_labelling_stage());
    state
}
