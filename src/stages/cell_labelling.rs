//! The `cell_labelling` stage: per-cluster reference label assignments.

use crate::core::container::{
    load_string_vector, open_group, open_typed_dataset, DataType, DataValues, GroupNode, Node,
};
use crate::core::error::{ErrorKind, Result, ResultExt};
use rustc_hash::FxHashSet;

const STAGE: &str = "cell_labelling";

pub fn validate(state: &GroupNode, nclusters: usize) -> Result<()> {
    let stage = super::open_stage(state, STAGE)?;
    let params = super::open_parameters(stage, STAGE)?;
    let references = super::parameters_context(validate_parameters(params), STAGE)?;
    let results = super::open_results(stage, STAGE)?;
    super::results_context(validate_results(results, &references, nclusters), STAGE)
}

/// Reference names must be unique across the human and mouse lists.
fn validate_parameters(params: &GroupNode) -> Result<FxHashSet<String>> {
    let mut references = FxHashSet::default();
    for list in ["human_references", "mouse_references"] {
        if !params.contains(list) {
            continue;
        }
        let names = load_string_vector(params, list, None)?;
        for name in names {
            if !references.insert(name.clone()) {
                return Err(ErrorKind::DuplicateName { name: name.clone() }.into());
            }
        }
    }
    Ok(references)
}

fn validate_results(
    results: &GroupNode,
    references: &FxHashSet<String>,
    nclusters: usize,
) -> Result<()> {
    let per_reference = open_group(results, "per_reference")?;
    let mut used = 0usize;
    for name in per_reference.child_names() {
        if !references.contains(name) {
            return Err(ErrorKind::InconsistentCount(format!(
                "reference '{}' has labels but was not declared in the parameters",
                name
            ))
            .into());
        }
        open_typed_dataset(per_reference, name, DataType::String, &[nclusters])
            .with_context(|| format!("failed to check labels for reference '{}'", name))?;
        used += 1;
    }

    // Multiple references require an integrated consensus naming the best
    // reference per cluster, drawn from the declared set.
    if used > 1 {
        let integrated = open_typed_dataset(results, "integrated", DataType::String, &[nclusters])?;
        if let DataValues::String(values) = &integrated.values {
            for value in values {
                if !references.contains(value) {
                    return Err(ErrorKind::InvalidEnum {
                        field: "integrated".to_string(),
                        value: value.clone(),
                    }
                    .into());
                }
            }
        }
    } else if let Some(Node::Dataset(_)) = results.get("integrated") {
        open_typed_dataset(results, "integrated", DataType::String, &[nclusters])?;
    }

    Ok(())
}
