//! The `inputs` stage: file manifest, dataset layout, and the counts every
//! downstream stage depends on.

use crate::core::container::{
    load_integer_scalar, load_integer_vector, load_string_scalar, load_string_vector, open_dataset,
    open_group, DataType, DataValues, GroupNode, Node,
};
use crate::core::context::Modality;
use crate::core::error::{ErrorKind, Result};
use crate::core::primitives::{check_enum, check_identity_vector, check_positive_integer};
use crate::core::version::PipelineVariant;
use rustc_hash::{FxHashMap, FxHashSet};

const KNOWN_FORMATS: [&str; 4] = ["MatrixMarket", "10X", "H5AD", "SummarizedExperiment"];

/// Derived values produced by validating the inputs stage.
#[derive(Debug, Clone)]
pub struct InputsSummary {
    pub num_cells: usize,
    pub num_blocks: usize,
    pub feature_counts: FxHashMap<Modality, usize>,
}

pub fn validate(
    state: &GroupNode,
    embedded: bool,
    variant: PipelineVariant,
) -> Result<InputsSummary> {
    let stage = super::open_stage(state, "inputs")?;
    let params = super::open_parameters(stage, "inputs")?;
    let layout = super::parameters_context(validate_parameters(params, embedded), "inputs")?;
    let results = super::open_results(stage, "inputs")?;
    super::results_context(validate_results(results, &layout, variant), "inputs")
}

/// Manifest facts needed to cross-check the results subtree.
struct InputLayout {
    num_datasets: usize,
    num_samples: Option<usize>,
    has_sample_factor: bool,
}

fn validate_parameters(params: &GroupNode, embedded: bool) -> Result<InputLayout> {
    let num_datasets = validate_formats(params)?;

    if num_datasets > 1 {
        let names = load_string_vector(params, "dataset_names", Some(num_datasets))?;
        check_unique_names(names, "dataset_names")?;
    }

    let num_files = validate_files(params, embedded)?;

    let mut num_samples = None;
    if params.contains("sample_groups") {
        let groups = load_integer_vector(params, "sample_groups", None)?;
        let mut total: i64 = 0;
        for &count in groups {
            if count <= 0 {
                return Err(ErrorKind::OutOfRange {
                    field: "sample_groups".to_string(),
                    reason: "all entries must be positive".to_string(),
                }
                .into());
            }
            total = total.checked_add(count).ok_or_else(|| ErrorKind::OutOfRange {
                field: "sample_groups".to_string(),
                reason: "entries sum beyond the representable range".to_string(),
            })?;
        }
        if total as usize != num_files {
            return Err(ErrorKind::InconsistentCount(format!(
                "sum of 'sample_groups' ({}) does not equal the number of file records ({})",
                total, num_files
            ))
            .into());
        }
        let names = load_string_vector(params, "sample_names", Some(groups.len()))?;
        check_unique_names(names, "sample_names")?;
        num_samples = Some(groups.len());
    }

    let has_sample_factor = params.contains("sample_factor");
    if has_sample_factor {
        load_string_scalar(params, "sample_factor")?;
        if num_datasets > 1 {
            return Err(ErrorKind::InconsistentCount(
                "'sample_factor' is only allowed with a single dataset".to_string(),
            )
            .into());
        }
    }

    Ok(InputLayout {
        num_datasets,
        num_samples,
        has_sample_factor,
    })
}

/// Validates `format` as a known-format scalar or per-dataset vector, and
/// returns the dataset count.
fn validate_formats(params: &GroupNode) -> Result<usize> {
    let ds = open_dataset(params, "format")?;
    if ds.dtype != DataType::String {
        return Err(ErrorKind::WrongType {
            name: "format".to_string(),
            expected: DataType::String.name().to_string(),
        }
        .into());
    }
    let formats = match &ds.values {
        DataValues::String(v) => v,
        _ => unreachable!("dtype checked above"),
    };
    if !ds.is_scalar() && ds.shape.len() != 1 {
        return Err(ErrorKind::WrongShape {
            name: "format".to_string(),
        }
        .into());
    }
    for f in formats {
        check_enum(f, &KNOWN_FORMATS, "format")?;
    }
    Ok(formats.len())
}

/// Validates the per-file records under `files` and returns their count.
/// Embedded manifests must form a contiguous byte-offset chain from zero.
fn validate_files(params: &GroupNode, embedded: bool) -> Result<usize> {
    let files = open_group(params, "files")?;
    let mut seen_names: FxHashSet<String> = FxHashSet::default();
    let mut extents: Vec<(i64, i64)> = Vec::new();

    for child in files.child_names() {
        let record = match files.get(child) {
            Some(Node::Group(g)) => g,
            _ => return Err(ErrorKind::MissingGroup(format!("files/{}", child)).into()),
        };
        load_string_scalar(record, "type")?;
        let name = load_string_scalar(record, "name")?;
        if !seen_names.insert(name.clone()) {
            return Err(ErrorKind::DuplicateName { name }.into());
        }

        if embedded {
            let offset = load_integer_scalar(record, "offset")?;
            let size = load_integer_scalar(record, "size")?;
            if offset < 0 || size < 0 {
                return Err(ErrorKind::OutOfRange {
                    field: format!("files/{}", child),
                    reason: "offset and size must be non-negative".to_string(),
                }
                .into());
            }
            extents.push((offset, size));
        } else {
            load_string_scalar(record, "id")?;
        }
    }

    if embedded {
        extents.sort_unstable();
        let mut expected = 0i64;
        for (offset, size) in extents {
            if offset != expected {
                return Err(ErrorKind::InconsistentCount(format!(
                    "embedded file offsets are not contiguous (expected {}, found {})",
                    expected, offset
                ))
                .into());
            }
            expected = offset.checked_add(size).ok_or_else(|| ErrorKind::OutOfRange {
                field: "files".to_string(),
                reason: format!(
                    "embedded extent at offset {} overflows the addressable range",
                    offset
                ),
            })?;
        }
    }

    Ok(files.len())
}

fn validate_results(
    results: &GroupNode,
    layout: &InputLayout,
    variant: PipelineVariant,
) -> Result<InputsSummary> {
    let num_cells = check_positive_integer(results, "num_cells")? as usize;

    let block_field = match variant {
        PipelineVariant::V3 => "num_blocks",
        _ => "num_samples",
    };
    let num_blocks = check_positive_integer(results, block_field)? as usize;

    // Cross-check the block count against the manifest shape. A single dataset
    // with a block factor can produce any number of blocks.
    if let Some(n) = layout.num_samples {
        if num_blocks != n {
            return Err(ErrorKind::InconsistentCount(format!(
                "'{}' ({}) does not equal the number of sample groups ({})",
                block_field, num_blocks, n
            ))
            .into());
        }
    } else if layout.num_datasets > 1 && num_blocks != layout.num_datasets {
        return Err(ErrorKind::InconsistentCount(format!(
            "'{}' ({}) does not equal the number of datasets ({})",
            block_field, num_blocks, layout.num_datasets
        ))
        .into());
    } else if layout.num_datasets == 1 && !layout.has_sample_factor && num_blocks != 1 {
        return Err(ErrorKind::InconsistentCount(format!(
            "'{}' should be 1 for a single dataset without a sample factor",
            block_field
        ))
        .into());
    }

    let feature_counts = match variant {
        PipelineVariant::V3 => {
            let identities = open_group(results, "identities")?;
            let mut counts = FxHashMap::default();
            for modality in Modality::ALL {
                if modality == Modality::Rna || identities.contains(modality.name()) {
                    let n = check_identity_vector(identities, modality.name())?;
                    counts.insert(modality, n);
                }
            }
            counts
        }
        PipelineVariant::V2 => {
            let mut counts = FxHashMap::default();
            counts.insert(Modality::Rna, check_identity_vector(results, "identities")?);
            if results.contains("adt_identities") {
                counts.insert(
                    Modality::Adt,
                    check_identity_vector(results, "adt_identities")?,
                );
            }
            counts
        }
        PipelineVariant::V1 => {
            let mut counts = FxHashMap::default();
            counts.insert(Modality::Rna, check_identity_vector(results, "identities")?);
            counts
        }
    };

    Ok(InputsSummary {
        num_cells,
        num_blocks,
        feature_counts,
    })
}

fn check_unique_names(names: &[String], field: &str) -> Result<()> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ErrorKind::DuplicateName {
                name: format!("{}/{}", field, name),
            }
            .into());
        }
    }
    Ok(())
}
