//! Per-modality quality control stages, driven by a modality descriptor.
//!
//! RNA, ADT and CRISPR quality control share the same structure and differ
//! only in stage name and field phonebook, so a single validator takes a
//! [`QcDescriptor`] instead of existing three times.

use crate::core::container::{
    load_string_scalar, open_group, open_typed_dataset, DataType, GroupNode,
};
use crate::core::context::Modality;
use crate::core::error::Result;
use crate::core::primitives::{
    check_bool_flag, check_discard_vector, check_nonnegative_float, check_unit_interval,
};

/// Per-cell metric and per-block threshold fields for one modality.
#[derive(Debug, Clone, Copy)]
pub struct QcDescriptor {
    pub modality: Modality,
    /// (field name, element type), each `[num_cells]`.
    pub metrics: &'static [(&'static str, DataType)],
    /// Float fields, each `[num_blocks]`.
    pub thresholds: &'static [&'static str],
    /// Whether the parameters may carry a `skip` flag.
    pub allows_skip: bool,
}

pub const RNA_QC: QcDescriptor = QcDescriptor {
    modality: Modality::Rna,
    metrics: &[
        ("sums", DataType::Float),
        ("detected", DataType::Integer),
        ("proportion", DataType::Float),
    ],
    thresholds: &["sums", "detected", "proportion"],
    allows_skip: false,
};

pub const ADT_QC: QcDescriptor = QcDescriptor {
    modality: Modality::Adt,
    metrics: &[
        ("sums", DataType::Float),
        ("detected", DataType::Integer),
        ("igg_total", DataType::Float),
    ],
    thresholds: &["detected", "igg_total"],
    allows_skip: true,
};

pub const CRISPR_QC: QcDescriptor = QcDescriptor {
    modality: Modality::Crispr,
    metrics: &[
        ("sums", DataType::Float),
        ("detected", DataType::Integer),
        ("max_proportion", DataType::Float),
        ("max_index", DataType::Integer),
    ],
    thresholds: &["max_count"],
    allows_skip: true,
};

/// Validates one quality-control stage. Returns the post-QC retained cell
/// count, or `None` when the modality is unused or the stage was skipped.
pub fn validate(
    state: &GroupNode,
    stage_name: &str,
    descriptor: &QcDescriptor,
    in_use: bool,
    num_cells: usize,
    num_blocks: usize,
) -> Result<Option<usize>> {
    let stage = super::open_stage(state, stage_name)?;
    let params = super::open_parameters(stage, stage_name)?;
    let skipped = super::parameters_context(validate_parameters(params, descriptor), stage_name)?;
    let results = super::open_results(stage, stage_name)?;
    super::results_context(
        validate_results(results, descriptor, in_use && !skipped, num_cells, num_blocks),
        stage_name,
    )
}

/// Returns whether the stage is flagged as skipped.
fn validate_parameters(params: &GroupNode, descriptor: &QcDescriptor) -> Result<bool> {
    match descriptor.modality {
        Modality::Rna => {
            check_bool_flag(params, "use_mito_default")?;
            load_string_scalar(params, "mito_prefix")?;
            check_nonnegative_float(params, "nmads")?;
        }
        Modality::Adt => {
            load_string_scalar(params, "igg_prefix")?;
            check_nonnegative_float(params, "nmads")?;
            check_unit_interval(params, "min_detected_drop", true)?;
        }
        Modality::Crispr => {
            check_nonnegative_float(params, "nmads")?;
        }
    }

    if descriptor.allows_skip && params.contains("skip") {
        check_bool_flag(params, "skip")
    } else {
        Ok(false)
    }
}

/// When active, `metrics`/`thresholds`/`discards` are all mandatory. When
/// inactive (modality unused or skipped), each piece is validated only if
/// present; a partially-present results subtree is tolerated.
fn validate_results(
    results: &GroupNode,
    descriptor: &QcDescriptor,
    active: bool,
    num_cells: usize,
    num_blocks: usize,
) -> Result<Option<usize>> {
    if active || results.contains("metrics") {
        let metrics = open_group(results, "metrics")?;
        for (field, dtype) in descriptor.metrics {
            open_typed_dataset(metrics, field, *dtype, &[num_cells])?;
        }
    }

    if active || results.contains("thresholds") {
        let thresholds = open_group(results, "thresholds")?;
        for field in descriptor.thresholds {
            open_typed_dataset(thresholds, field, DataType::Float, &[num_blocks])?;
        }
    }

    if active || results.contains("discards") {
        let remaining = check_discard_vector(results, num_cells)?;
        return Ok(if active { Some(remaining) } else { None });
    }

    Ok(None)
}
