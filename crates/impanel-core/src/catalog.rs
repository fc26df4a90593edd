//! Dataset catalog
//!
//! Enumerates the named fields a source offers, in a deterministic order,
//! and applies include/exclude filtering. The catalog is the input to the
//! layout planner and the pipeline builder.

use crate::error::{CatalogError, CoreResult};
use impanel_source::{FieldDescriptor, FieldIndex, FileSource};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field names excluded by default; bookkeeping data that is rarely
/// interesting to look at.
pub const DEFAULT_FILTER_NAMES: [&str; 2] = ["node_groups", "mat_id"];

/// Which fields of a source to catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogFilter {
    /// Keep everything except the listed names
    Exclude(Vec<String>),
    /// Keep exactly the listed names; failing to find any of them is an
    /// error, finding only some logs a warning
    Only(Vec<String>),
}

impl CatalogFilter {
    /// Exclude-list filter over the default bookkeeping names
    pub fn standard() -> Self {
        CatalogFilter::Exclude(DEFAULT_FILTER_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// Keep every field
    pub fn none() -> Self {
        CatalogFilter::Exclude(Vec::new())
    }
}

impl Default for CatalogFilter {
    fn default() -> Self {
        Self::standard()
    }
}

/// Enumerate a source's fields as an ordered, filtered catalog
///
/// Names are sorted within each (family, kind) bucket, then concatenated in
/// fixed bucket order: point scalars, point vectors, point tensors, cell
/// scalars, cell vectors, cell tensors. Empty names (backend "no selection"
/// sentinels) are dropped.
pub fn enumerate<S: FileSource + ?Sized>(
    source: &S,
    filter: &CatalogFilter,
) -> CoreResult<Vec<FieldDescriptor>> {
    let index = source.field_index()?;
    let names = collect_sorted(&index);
    Ok(apply_filter(names, filter)?)
}

fn collect_sorted(index: &FieldIndex) -> Vec<FieldDescriptor> {
    let mut out = Vec::new();
    for (family, kind) in FieldIndex::bucket_order() {
        let mut names: Vec<&String> = index
            .bucket(family, kind)
            .iter()
            .filter(|name| !name.is_empty())
            .collect();
        names.sort();
        out.extend(
            names
                .into_iter()
                .map(|name| FieldDescriptor::new(family, kind, name)),
        );
    }
    out
}

fn apply_filter(
    names: Vec<FieldDescriptor>,
    filter: &CatalogFilter,
) -> Result<Vec<FieldDescriptor>, CatalogError> {
    match filter {
        CatalogFilter::Exclude(excluded) => Ok(names
            .into_iter()
            .filter(|desc| !excluded.iter().any(|e| e == &desc.name))
            .collect()),

        CatalogFilter::Only(only) => {
            let kept: Vec<FieldDescriptor> = names
                .iter()
                .filter(|desc| only.iter().any(|o| o == &desc.name))
                .cloned()
                .collect();

            if kept.is_empty() {
                return Err(CatalogError::NoMatchingFields {
                    requested: only.clone(),
                    available: names.into_iter().map(|d| d.name).collect(),
                });
            }
            if kept.len() != only.len() {
                let found: Vec<&str> = kept.iter().map(|d| d.name.as_str()).collect();
                warn!(requested = ?only, ?found, "some requested field names were not found");
            }
            Ok(kept)
        }
    }
}

/// Length of the widest field label, floored at 5 and padded by 2
///
/// Used to normalize relative label widths across the grid.
pub fn max_label_width(catalog: &[FieldDescriptor]) -> usize {
    catalog
        .iter()
        .map(|desc| desc.name.len())
        .max()
        .unwrap_or(0)
        .max(5)
        + 2
}
