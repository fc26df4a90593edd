//! Field schema types for simulation-result sources
//!
//! A result file carries named data fields, each defined over the points or
//! cells of a spatial mesh and holding scalar, vector, or tensor values.
//! This module describes that schema: `FieldDescriptor` identifies one field,
//! `FieldIndex` is the per-bucket enumeration a backend reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when interpreting schema strings from an external catalog
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown field family: {0}")]
    UnknownFamily(String),

    #[error("unsupported field kind: {0}")]
    UnsupportedKind(String),

    #[error("malformed field descriptor: {0} (expected family/kind/name)")]
    MalformedDescriptor(String),
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Where on the mesh a field is defined
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldFamily {
    /// Values attached to mesh points (nodes)
    Point,
    /// Values attached to mesh cells (elements)
    Cell,
}

impl FieldFamily {
    /// Lowercase name as used in backend attribute paths
    pub fn name(&self) -> &'static str {
        match self {
            FieldFamily::Point => "point",
            FieldFamily::Cell => "cell",
        }
    }
}

impl fmt::Display for FieldFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldFamily {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        match s {
            "point" => Ok(FieldFamily::Point),
            "cell" => Ok(FieldFamily::Cell),
            other => Err(SchemaError::UnknownFamily(other.to_string())),
        }
    }
}

/// The tensorial order of a field's values
///
/// This is a closed set: the pipeline matches on it exhaustively. Kinds
/// arriving as strings from an external catalog go through `FromStr`, which
/// is the one place an unsupported kind can surface at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar,
    Vector,
    Tensor,
}

impl FieldKind {
    /// Plural name as used in backend attribute paths ("scalars", ...)
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalars",
            FieldKind::Vector => "vectors",
            FieldKind::Tensor => "tensors",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> SchemaResult<Self> {
        match s {
            "scalar" | "scalars" => Ok(FieldKind::Scalar),
            "vector" | "vectors" => Ok(FieldKind::Vector),
            "tensor" | "tensors" => Ok(FieldKind::Tensor),
            other => Err(SchemaError::UnsupportedKind(other.to_string())),
        }
    }
}

/// Identity of one named field: (family, kind, name)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Point or cell family
    pub family: FieldFamily,

    /// Scalar, vector, or tensor kind
    pub kind: FieldKind,

    /// Field name as reported by the backend
    pub name: String,
}

impl FieldDescriptor {
    /// Create a new descriptor
    pub fn new(family: FieldFamily, kind: FieldKind, name: impl Into<String>) -> Self {
        Self {
            family,
            kind,
            name: name.into(),
        }
    }

    /// The backend attribute path, e.g. "point_vectors_displacement"
    pub fn attribute_path(&self) -> String {
        format!("{}_{}_{}", self.family.name(), self.kind.name(), self.name)
    }

    /// The same field re-homed on the point family
    ///
    /// Cell fields are interpolated to points before vector/tensor display;
    /// the attribute activated afterwards is the point-family one.
    pub fn as_point(&self) -> Self {
        Self {
            family: FieldFamily::Point,
            kind: self.kind,
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.family, self.kind, self.name)
    }
}

impl FromStr for FieldDescriptor {
    type Err = SchemaError;

    /// Parse "family/kind/name", e.g. "point/scalars/temperature"
    fn from_str(s: &str) -> SchemaResult<Self> {
        let mut parts = s.splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(family), Some(kind), Some(name)) if !name.is_empty() => Ok(Self {
                family: family.parse()?,
                kind: kind.parse()?,
                name: name.to_string(),
            }),
            _ => Err(SchemaError::MalformedDescriptor(s.to_string())),
        }
    }
}

/// Per-bucket field name enumeration reported by a backend
///
/// Some backends append a terminal "no selection" sentinel to each bucket;
/// it is encoded here as an empty name and must be ignored by consumers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldIndex {
    pub point_scalars: Vec<String>,
    pub point_vectors: Vec<String>,
    pub point_tensors: Vec<String>,
    pub cell_scalars: Vec<String>,
    pub cell_vectors: Vec<String>,
    pub cell_tensors: Vec<String>,
}

impl FieldIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// The names of one (family, kind) bucket
    pub fn bucket(&self, family: FieldFamily, kind: FieldKind) -> &[String] {
        match (family, kind) {
            (FieldFamily::Point, FieldKind::Scalar) => &self.point_scalars,
            (FieldFamily::Point, FieldKind::Vector) => &self.point_vectors,
            (FieldFamily::Point, FieldKind::Tensor) => &self.point_tensors,
            (FieldFamily::Cell, FieldKind::Scalar) => &self.cell_scalars,
            (FieldFamily::Cell, FieldKind::Vector) => &self.cell_vectors,
            (FieldFamily::Cell, FieldKind::Tensor) => &self.cell_tensors,
        }
    }

    /// Mutable access to one bucket
    pub fn bucket_mut(&mut self, family: FieldFamily, kind: FieldKind) -> &mut Vec<String> {
        match (family, kind) {
            (FieldFamily::Point, FieldKind::Scalar) => &mut self.point_scalars,
            (FieldFamily::Point, FieldKind::Vector) => &mut self.point_vectors,
            (FieldFamily::Point, FieldKind::Tensor) => &mut self.point_tensors,
            (FieldFamily::Cell, FieldKind::Scalar) => &mut self.cell_scalars,
            (FieldFamily::Cell, FieldKind::Vector) => &mut self.cell_vectors,
            (FieldFamily::Cell, FieldKind::Tensor) => &mut self.cell_tensors,
        }
    }

    /// Fixed bucket traversal order: point before cell, scalar/vector/tensor
    pub fn bucket_order() -> [(FieldFamily, FieldKind); 6] {
        [
            (FieldFamily::Point, FieldKind::Scalar),
            (FieldFamily::Point, FieldKind::Vector),
            (FieldFamily::Point, FieldKind::Tensor),
            (FieldFamily::Cell, FieldKind::Scalar),
            (FieldFamily::Cell, FieldKind::Vector),
            (FieldFamily::Cell, FieldKind::Tensor),
        ]
    }

    /// Total number of names across all buckets, sentinels included
    pub fn len(&self) -> usize {
        Self::bucket_order()
            .iter()
            .map(|&(f, k)| self.bucket(f, k).len())
            .sum()
    }

    /// True when no bucket holds any name
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
