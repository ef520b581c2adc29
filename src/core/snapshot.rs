//! JSON container-snapshot backend.
//!
//! A portable dump of the group/dataset tree, used by the CLI and by tests
//! that exercise the filesystem path. An HDF5 reader is an external
//! collaborator that materializes the same [`GroupNode`] tree directly.

use crate::core::container::{DataType, DataValues, DatasetNode, GroupNode, Node};
use crate::core::error::{ErrorKind, Result, ResultExt};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum RawNode {
    Group {
        #[serde(default)]
        children: BTreeMap<String, RawNode>,
    },
    Dataset {
        dtype: RawType,
        #[serde(default)]
        shape: Vec<usize>,
        values: RawValues,
    },
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum RawType {
    Integer,
    Float,
    String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValues {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
}

/// Parses a JSON snapshot into a container tree. The root must be a group and
/// every dataset's value count must match the product of its shape extents.
pub fn parse_snapshot(text: &str) -> Result<GroupNode> {
    let raw: RawNode = serde_json::from_str(text).map_err(|e| {
        ErrorKind::InconsistentCount(format!("snapshot is not valid JSON: {}", e))
    })?;
    match raw {
        RawNode::Group { children } => build_group(children),
        RawNode::Dataset { .. } => {
            Err(ErrorKind::MissingGroup("root of the snapshot".to_string()).into())
        }
    }
}

fn build_group(children: BTreeMap<String, RawNode>) -> Result<GroupNode> {
    let mut group = GroupNode::new();
    for (name, raw) in children {
        let node = match raw {
            RawNode::Group { children } => {
                Node::Group(build_group(children).with_context(|| {
                    format!("failed to build snapshot group '{}'", name)
                })?)
            }
            RawNode::Dataset {
                dtype,
                shape,
                values,
            } => Node::Dataset(
                build_dataset(dtype, shape, values, &name)
                    .with_context(|| format!("failed to build snapshot dataset '{}'", name))?,
            ),
        };
        group.insert(name, node);
    }
    Ok(group)
}

fn build_dataset(
    dtype: RawType,
    shape: Vec<usize>,
    values: RawValues,
    name: &str,
) -> Result<DatasetNode> {
    let (dtype, values) = match (dtype, values) {
        (RawType::Integer, RawValues::Integer(v)) => (DataType::Integer, DataValues::Integer(v)),
        // JSON cannot distinguish 1 from 1.0, so integer payloads are accepted
        // for float datasets.
        (RawType::Float, RawValues::Float(v)) => (DataType::Float, DataValues::Float(v)),
        (RawType::Float, RawValues::Integer(v)) => (
            DataType::Float,
            DataValues::Float(v.into_iter().map(|x| x as f64).collect()),
        ),
        (RawType::String, RawValues::String(v)) => (DataType::String, DataValues::String(v)),
        _ => {
            return Err(ErrorKind::WrongType {
                name: name.to_string(),
                expected: "matching declared dtype".to_string(),
            }
            .into())
        }
    };

    let expected: usize = shape.iter().product();
    if values.len() != expected {
        return Err(ErrorKind::WrongShape {
            name: name.to_string(),
        }
        .into());
    }
    Ok(DatasetNode {
        dtype,
        shape,
        values,
    })
}
