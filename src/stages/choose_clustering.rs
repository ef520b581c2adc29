//! The `choose_clustering` stage: records which clustering method downstream
//! stages must have materialized.

use crate::core::container::{load_string_scalar, GroupNode};
use crate::core::context::ClusteringMethod;
use crate::core::error::Result;
use crate::core::primitives::check_enum;

const STAGE: &str = "choose_clustering";

pub fn validate(state: &GroupNode) -> Result<ClusteringMethod> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let method = super::parameters_context(
        (|| {
            let method = load_string_scalar(params, "method")?;
            check_enum(&method, &["kmeans", "snn_graph"], "method")?;
            Ok(method)
        })(),
        STAGE,
    )?;
    super::open_results(stage, STAGE)?;

    Ok(match method.as_str() {
        "kmeans" => ClusteringMethod::Kmeans,
        _ => ClusteringMethod::SnnGraph,
    })
}
