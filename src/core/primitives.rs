//! Shared validation primitives used across stage validators.

use crate::core::container::{
    load_float_vector, load_integer_vector, open_dataset, DataType, GroupNode,
};
use crate::core::error::{ErrorKind, Result};

/// Loads `discards` as an integer vector of length `num_cells` and returns the
/// number of retained (zero-valued) entries.
pub fn check_discard_vector(group: &GroupNode, num_cells: usize) -> Result<usize> {
    let discards = load_integer_vector(group, "discards", Some(num_cells))?;
    Ok(discards.iter().filter(|&&x| x == 0).count())
}

/// Fails with `InvalidEnum` when `value` is not in the allowed set.
pub fn check_enum(value: &str, allowed: &[&str], field: &str) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ErrorKind::InvalidEnum {
            field: field.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

/// Validates a cluster assignment vector and returns the observed cluster
/// count (`max + 1`). All labels must be non-negative (and below `upper_bound`
/// when given), and every index in `[0, nclusters)` must be represented at
/// least once. An empty assignment trivially yields zero clusters.
pub fn check_cluster_assignment(labels: &[i64], upper_bound: Option<i64>) -> Result<usize> {
    if labels.is_empty() {
        return Ok(0);
    }

    let mut max = -1i64;
    for &label in labels {
        if label < 0 {
            return Err(ErrorKind::OutOfRange {
                field: "clusters".to_string(),
                reason: format!("contains negative label {}", label),
            }
            .into());
        }
        if let Some(bound) = upper_bound {
            if label >= bound {
                return Err(ErrorKind::OutOfRange {
                    field: "clusters".to_string(),
                    reason: format!("label {} is not less than {}", label, bound),
                }
                .into());
            }
        }
        max = max.max(label);
    }

    // N entries cannot represent more than N distinct clusters, so a label of
    // N or above leaves a gap somewhere below N. Rejecting here also keeps the
    // occupancy vector bounded by the assignment length.
    if max as u64 >= labels.len() as u64 {
        let mut seen = vec![false; labels.len()];
        for &label in labels {
            if (label as u64) < seen.len() as u64 {
                seen[label as usize] = true;
            }
        }
        let cluster = seen.iter().position(|&p| !p).unwrap_or(0) as i64;
        return Err(ErrorKind::EmptyCluster { cluster }.into());
    }

    let nclusters = (max + 1) as usize;
    let mut seen = vec![false; nclusters];
    for &label in labels {
        seen[label as usize] = true;
    }
    for (cluster, present) in seen.iter().enumerate() {
        if !present {
            return Err(ErrorKind::EmptyCluster {
                cluster: cluster as i64,
            }
            .into());
        }
    }
    Ok(nclusters)
}

/// True when the values are strictly ascending with no duplicates.
pub fn check_sorted_unique(values: &[i64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

/// Validates the PCA result pair: `var_exp` as a 1-D float vector of length at
/// most `max_pcs`, then `pcs` as a float matrix of `num_cells` by the observed
/// length. Returns the observed number of components.
pub fn check_pca_results(group: &GroupNode, max_pcs: usize, num_cells: usize) -> Result<usize> {
    let var_exp = load_float_vector(group, "var_exp", None)?;
    let observed = var_exp.len();
    if observed > max_pcs {
        return Err(ErrorKind::TooManyComponents {
            field: "var_exp".to_string(),
        }
        .into());
    }

    let pcs = open_dataset(group, "pcs")?;
    if pcs.dtype != DataType::Float {
        return Err(ErrorKind::WrongType {
            name: "pcs".to_string(),
            expected: DataType::Float.name().to_string(),
        }
        .into());
    }
    if pcs.shape != [num_cells, observed] {
        return Err(ErrorKind::WrongShape {
            name: "pcs".to_string(),
        }
        .into());
    }
    Ok(observed)
}

/// Runs `checker` when the named child exists or is required. A structurally
/// absent optional child is legal; a present one is always fully validated.
pub fn check_optional_or_required<F>(
    group: &GroupNode,
    name: &str,
    required: bool,
    checker: F,
) -> Result<()>
where
    F: FnOnce(&GroupNode) -> Result<()>,
{
    if group.contains(name) || required {
        checker(group)
    } else {
        Ok(())
    }
}

/// Loads an integer scalar and interprets it as a boolean flag.
pub fn check_bool_flag(group: &GroupNode, name: &str) -> Result<bool> {
    let value = crate::core::container::load_integer_scalar(group, name)?;
    Ok(value != 0)
}

pub fn check_positive_integer(group: &GroupNode, name: &str) -> Result<i64> {
    let value = crate::core::container::load_integer_scalar(group, name)?;
    if value <= 0 {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: format!("{} is not positive", value),
        }
        .into());
    }
    Ok(value)
}

pub fn check_nonnegative_integer(group: &GroupNode, name: &str) -> Result<i64> {
    let value = crate::core::container::load_integer_scalar(group, name)?;
    if value < 0 {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: format!("{} is negative", value),
        }
        .into());
    }
    Ok(value)
}

pub fn check_nonnegative_float(group: &GroupNode, name: &str) -> Result<f64> {
    let value = crate::core::container::load_float_scalar(group, name)?;
    if value.is_nan() || value < 0.0 {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: format!("{} is negative", value),
        }
        .into());
    }
    Ok(value)
}

pub fn check_positive_float(group: &GroupNode, name: &str) -> Result<f64> {
    let value = crate::core::container::load_float_scalar(group, name)?;
    if value.is_nan() || value <= 0.0 {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: format!("{} is not positive", value),
        }
        .into());
    }
    Ok(value)
}

/// Checks a float in `[0, 1)` when `exclusive_upper`, else `[0, 1]`.
pub fn check_unit_interval(group: &GroupNode, name: &str, exclusive_upper: bool) -> Result<f64> {
    let value = crate::core::container::load_float_scalar(group, name)?;
    let ok = if exclusive_upper {
        (0.0..1.0).contains(&value)
    } else {
        (0.0..=1.0).contains(&value)
    };
    if !ok {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: format!("{} is not in the unit interval", value),
        }
        .into());
    }
    Ok(value)
}

/// Validates a sorted-unique non-negative integer identity vector and returns
/// its length.
pub fn check_identity_vector(group: &GroupNode, name: &str) -> Result<usize> {
    let ids = load_integer_vector(group, name, None)?;
    if ids.iter().any(|&x| x < 0) {
        return Err(ErrorKind::OutOfRange {
            field: name.to_string(),
            reason: "contains negative identities".to_string(),
        }
        .into());
    }
    if !check_sorted_unique(ids) {
        return Err(ErrorKind::NotSortedUnique {
            field: name.to_string(),
        }
        .into());
    }
    Ok(ids.len())
}
