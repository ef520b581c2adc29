//! The `kmeans_cluster` stage.

use crate::core::container::{load_integer_vector, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::{check_cluster_assignment, check_positive_integer};

const STAGE: &str = "kmeans_cluster";

/// Returns the observed cluster count (0 when the assignment is absent).
/// The assignment is mandatory only when k-means is the chosen method; an
/// unchosen stage's results are still validated whenever present.
pub fn validate(state: &GroupNode, chosen: bool, filtered_cells: usize) -> Result<usize> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let k = super::parameters_context(check_positive_integer(params, "k"), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(
        validate_results(results, chosen, k, filtered_cells),
        STAGE,
    )
}

fn validate_results(results: &GroupNode, chosen: bool, k: i64, filtered_cells: usize) -> Result<usize> {
    if !chosen && !results.contains("clusters") {
        return Ok(0);
    }
    let clusters = load_integer_vector(results, "clusters", Some(filtered_cells))?;
    check_cluster_assignment(clusters, Some(k))
}
