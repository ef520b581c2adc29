//! In-memory container tree and access primitives.
//!
//! The validator traverses a hierarchical namespace of groups and datasets,
//! mirroring the HDF5 state file. Any backend (an HDF5 reader, the JSON
//! snapshot loader, hand-built test fixtures) materializes into this tree;
//! everything downstream is backend-agnostic.
//!
//! Child enumeration is unordered. Validators check children by name, never by
//! position.

use crate::core::error::{ErrorKind, Result};
use rustc_hash::FxHashMap;

/// Element type of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Float,
    String,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::String => "string",
        }
    }
}

/// Dataset contents, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValues {
    Integer(Vec<i64>),
    Float(Vec<f64>),
    String(Vec<String>),
}

impl DataValues {
    pub fn len(&self) -> usize {
        match self {
            DataValues::Integer(v) => v.len(),
            DataValues::Float(v) => v.len(),
            DataValues::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            DataValues::Integer(_) => DataType::Integer,
            DataValues::Float(_) => DataType::Float,
            DataValues::String(_) => DataType::String,
        }
    }
}

/// A dataset node: element type, shape, and values in row-major order.
/// An empty shape denotes a scalar holding exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetNode {
    pub dtype: DataType,
    pub shape: Vec<usize>,
    pub values: DataValues,
}

impl DatasetNode {
    pub fn integer_scalar(value: i64) -> Self {
        DatasetNode {
            dtype: DataType::Integer,
            shape: Vec::new(),
            values: DataValues::Integer(vec![value]),
        }
    }

    pub fn float_scalar(value: f64) -> Self {
        DatasetNode {
            dtype: DataType::Float,
            shape: Vec::new(),
            values: DataValues::Float(vec![value]),
        }
    }

    pub fn string_scalar(value: impl Into<String>) -> Self {
        DatasetNode {
            dtype: DataType::String,
            shape: Vec::new(),
            values: DataValues::String(vec![value.into()]),
        }
    }

    pub fn integer_vector(values: Vec<i64>) -> Self {
        DatasetNode {
            dtype: DataType::Integer,
            shape: vec![values.len()],
            values: DataValues::Integer(values),
        }
    }

    pub fn float_vector(values: Vec<f64>) -> Self {
        DatasetNode {
            dtype: DataType::Float,
            shape: vec![values.len()],
            values: DataValues::Float(values),
        }
    }

    pub fn string_vector(values: Vec<String>) -> Self {
        DatasetNode {
            dtype: DataType::String,
            shape: vec![values.len()],
            values: DataValues::String(values),
        }
    }

    /// Zero-filled 2-D float dataset. Validators only inspect shape and type of
    /// matrices, so fixture contents are immaterial.
    pub fn float_matrix(rows: usize, cols: usize) -> Self {
        DatasetNode {
            dtype: DataType::Float,
            shape: vec![rows, cols],
            values: DataValues::Float(vec![0.0; rows * cols]),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }
}

/// A group node: a flat namespace of named children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupNode {
    children: FxHashMap<String, Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Group(GroupNode),
    Dataset(DatasetNode),
}

impl GroupNode {
    pub fn new() -> Self {
        GroupNode::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.children.insert(name.into(), node);
    }

    pub fn insert_group(&mut self, name: impl Into<String>, group: GroupNode) {
        self.insert(name, Node::Group(group));
    }

    pub fn insert_dataset(&mut self, name: impl Into<String>, dataset: DatasetNode) {
        self.insert(name, Node::Dataset(dataset));
    }

    /// Insert an empty subgroup and return a mutable borrow of it.
    pub fn new_group(&mut self, name: impl Into<String>) -> &mut GroupNode {
        let name = name.into();
        self.children
            .insert(name.clone(), Node::Group(GroupNode::new()));
        match self.children.get_mut(&name) {
            Some(Node::Group(g)) => g,
            _ => unreachable!("group was just inserted"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.children.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Child names in container-native (unordered) iteration order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Opens a child group, failing if absent or not a group.
pub fn open_group<'a>(parent: &'a GroupNode, name: &str) -> Result<&'a GroupNode> {
    match parent.get(name) {
        Some(Node::Group(g)) => Ok(g),
        _ => Err(ErrorKind::MissingGroup(name.to_string()).into()),
    }
}

/// Opens a child dataset, failing if absent or not a dataset.
pub fn open_dataset<'a>(parent: &'a GroupNode, name: &str) -> Result<&'a DatasetNode> {
    match parent.get(name) {
        Some(Node::Dataset(d)) => Ok(d),
        _ => Err(ErrorKind::MissingDataset(name.to_string()).into()),
    }
}

/// Opens a child dataset and checks its element type and exact shape.
/// An empty `expected_shape` requires a scalar.
pub fn open_typed_dataset<'a>(
    parent: &'a GroupNode,
    name: &str,
    expected_type: DataType,
    expected_shape: &[usize],
) -> Result<&'a DatasetNode> {
    let ds = open_dataset(parent, name)?;
    if ds.dtype != expected_type {
        return Err(ErrorKind::WrongType {
            name: name.to_string(),
            expected: expected_type.name().to_string(),
        }
        .into());
    }
    if ds.shape != expected_shape {
        return Err(ErrorKind::WrongShape {
            name: name.to_string(),
        }
        .into());
    }
    Ok(ds)
}

pub fn load_integer_scalar(parent: &GroupNode, name: &str) -> Result<i64> {
    let ds = open_typed_dataset(parent, name, DataType::Integer, &[])?;
    match &ds.values {
        DataValues::Integer(v) => Ok(v[0]),
        _ => unreachable!("dtype checked above"),
    }
}

/// Loads a float scalar; an integer-typed scalar is accepted and promoted,
/// matching the permissive numeric reads of the state writers.
pub fn load_float_scalar(parent: &GroupNode, name: &str) -> Result<f64> {
    let ds = open_dataset(parent, name)?;
    if !ds.is_scalar() {
        return Err(ErrorKind::WrongShape {
            name: name.to_string(),
        }
        .into());
    }
    match &ds.values {
        DataValues::Float(v) => Ok(v[0]),
        DataValues::Integer(v) => Ok(v[0] as f64),
        DataValues::String(_) => Err(ErrorKind::WrongType {
            name: name.to_string(),
            expected: DataType::Float.name().to_string(),
        }
        .into()),
    }
}

pub fn load_string_scalar(parent: &GroupNode, name: &str) -> Result<String> {
    let ds = open_typed_dataset(parent, name, DataType::String, &[])?;
    match &ds.values {
        DataValues::String(v) => Ok(v[0].clone()),
        _ => unreachable!("dtype checked above"),
    }
}

/// Loads a 1-D integer dataset; `expected_len` of `None` accepts any length.
pub fn load_integer_vector<'a>(
    parent: &'a GroupNode,
    name: &str,
    expected_len: Option<usize>,
) -> Result<&'a [i64]> {
    let ds = open_dataset(parent, name)?;
    if ds.dtype != DataType::Integer {
        return Err(ErrorKind::WrongType {
            name: name.to_string(),
            expected: DataType::Integer.name().to_string(),
        }
        .into());
    }
    check_vector_shape(ds, name, expected_len)?;
    match &ds.values {
        DataValues::Integer(v) => Ok(v),
        _ => unreachable!("dtype checked above"),
    }
}

pub fn load_float_vector<'a>(
    parent: &'a GroupNode,
    name: &str,
    expected_len: Option<usize>,
) -> Result<&'a [f64]> {
    let ds = open_dataset(parent, name)?;
    if ds.dtype != DataType::Float {
        return Err(ErrorKind::WrongType {
            name: name.to_string(),
            expected: DataType::Float.name().to_string(),
        }
        .into());
    }
    check_vector_shape(ds, name, expected_len)?;
    match &ds.values {
        DataValues::Float(v) => Ok(v),
        _ => unreachable!("dtype checked above"),
    }
}

pub fn load_string_vector<'a>(
    parent: &'a GroupNode,
    name: &str,
    expected_len: Option<usize>,
) -> Result<&'a [String]> {
    let ds = open_dataset(parent, name)?;
    if ds.dtype != DataType::String {
        return Err(ErrorKind::WrongType {
            name: name.to_string(),
            expected: DataType::String.name().to_string(),
        }
        .into());
    }
    check_vector_shape(ds, name, expected_len)?;
    match &ds.values {
        DataValues::String(v) => Ok(v),
        _ => unreachable!("dtype checked above"),
    }
}

fn check_vector_shape(ds: &DatasetNode, name: &str, expected_len: Option<usize>) -> Result<()> {
    let ok = match expected_len {
        Some(n) => ds.shape == [n],
        None => ds.shape.len() == 1,
    };
    if ok {
        Ok(())
    } else {
        Err(ErrorKind::WrongShape {
            name: name.to_string(),
        }
        .into())
    }
}
