//! The `snn_graph_cluster` stage.

use crate::core::container::{load_string_scalar, load_integer_vector, GroupNode};
use crate::core::error::Result;
use crate::core::primitives::{
    check_cluster_assignment, check_enum, check_nonnegative_float, check_nonnegative_integer,
    check_positive_integer,
};

const STAGE: &str = "snn_graph_cluster";

/// Version-resolved options for the community detection parameters added in
/// the v3 format.
#[derive(Debug, Clone, Copy)]
pub struct SnnGraphOptions {
    pub has_algorithm_choice: bool,
}

/// Returns the observed cluster count (0 when the assignment is absent).
pub fn validate(
    state: &GroupNode,
    options: &SnnGraphOptions,
    chosen: bool,
    filtered_cells: usize,
) -> Result<usize> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    super::parameters_context(validate_parameters(params, options), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(validate_results(results, chosen, filtered_cells), STAGE)
}

fn validate_parameters(params: &GroupNode, options: &SnnGraphOptions) -> Result<()> {
    check_positive_integer(params, "k")?;
    let scheme = load_string_scalar(params, "scheme")?;
    check_enum(&scheme, &["rank", "jaccard", "number"], "scheme")?;

    if options.has_algorithm_choice {
        let algorithm = load_string_scalar(params, "algorithm")?;
        check_enum(
            &algorithm,
            &["multilevel", "walktrap", "leiden"],
            "algorithm",
        )?;
        check_nonnegative_float(params, "multilevel_resolution")?;
        check_nonnegative_float(params, "leiden_resolution")?;
        check_nonnegative_integer(params, "walktrap_steps")?;
    }
    Ok(())
}

fn validate_results(results: &GroupNode, chosen: bool, filtered_cells: usize) -> Result<usize> {
    if !chosen && !results.contains("clusters") {
        return Ok(0);
    }
    let clusters = load_integer_vector(results, "clusters", Some(filtered_cells))?;
    check_cluster_assignment(clusters, None)
}
