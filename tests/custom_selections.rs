//! Custom selection declarations and combined-embedding weight behavior.

mod common;

use common::{group_at_mut, FILTERED_CELLS, NUM_GENES};
use kanacheck::core::container::{DatasetNode, GroupNode};
use kanacheck::validate;

fn selection_stats() -> GroupNode {
    let mut g = GroupNode::new();
    for stat in ["means", "detected", "lfc", "delta_detected", "cohen", "auc"] {
        g.insert_dataset(stat, DatasetNode::float_vector(vec![0.0; NUM_GENES]));
    }
    g
}

/// A v3 state with one declared selection and its per-modality statistics.
fn with_selection(indices: Vec<i64>) -> GroupNode {
    let mut state = common::v3_state();
    group_at_mut(&mut state, &["custom_selections", "parameters", "selections"])
        .insert_dataset("activated", DatasetNode::integer_vector(indices));
    group_at_mut(&mut state, &["custom_selections", "results", "per_selection", "RNA"])
        .insert_group("activated", selection_stats());
    state
}

#[test]
fn declared_selections_are_validated() {
    let state = with_selection(vec![0, 5, 9]);
    validate(&state, false, 3_000_000).unwrap();
}

#[test]
fn selection_indices_must_be_sorted_unique() {
    let state = with_selection(vec![5, 0, 9]);
    let err = validate(&state, false, 3_000_000).unwrap_err();
    assert!(err.to_string().contains("sorted and unique"));

    let state = with_selection(vec![0, 5, 5]);
    assert!(validate(&state, false, 3_000_000).is_err());
}

#[test]
fn selection_indices_must_lie_within_filtered_cells() {
    let state = with_selection(vec![0, FILTERED_CELLS as i64]);
    let err = validate(&state, false, 3_000_000).unwrap_err();
    assert!(err.to_string().contains("filtered cell range"));
}

#[test]
fn undeclared_selection_results_are_rejected() {
    let mut state = common::v3_state();
    group_at_mut(&mut state, &["custom_selections", "results", "per_selection", "RNA"])
        .insert_group("mystery", selection_stats());
    let err = validate(&state, false, 3_000_000).unwrap_err();
    assert!(err.to_string().contains("not declared"));
}

#[test]
fn declared_selections_need_complete_statistics() {
    let mut state = with_selection(vec![0, 5, 9]);
    group_at_mut(
        &mut state,
        &["custom_selections", "results", "per_selection", "RNA", "activated"],
    )
    .remove("cohen");
    let err = validate(&state, false, 3_000_000).unwrap_err();
    assert!(err.to_string().contains("cohen"));
}

#[test]
fn combined_weights_cannot_all_be_zero() {
    let mut state = common::v3_state();
    group_at_mut(&mut state, &["combine_embeddings", "parameters"])
        .insert_dataset("rna_weight", DatasetNode::float_scalar(0.0));
    let err = validate(&state, false, 3_000_000).unwrap_err();
    assert!(err.to_string().contains("nonzero weight"));
}
