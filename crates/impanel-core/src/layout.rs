//! Grid layout planner
//!
//! Assigns each cataloged field a cell on an automatic grid in scene
//! coordinates. Row and column counts are derived from the field count and a
//! layout mode; cell spacing comes from the domain bounding box so panels
//! never overlap.

use crate::error::CoreError;
use impanel_source::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Margin applied to the bounding-box extent when spacing grid cells
pub const CELL_MARGIN: f64 = 1.1;

/// Largest automatic column count for the square-ish layouts
pub const MAX_AUTO_COLUMNS: usize = 5;

/// How the grid is filled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Single row, one column per field
    Row,
    /// Single column, one row per field
    Col,
    /// Square-ish grid filled left-to-right, then down
    #[default]
    RowCol,
    /// Square-ish grid with swapped counts, filled top-to-bottom, then right
    ColRow,
}

impl LayoutMode {
    /// Lowercase name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            LayoutMode::Row => "row",
            LayoutMode::Col => "col",
            LayoutMode::RowCol => "rowcol",
            LayoutMode::ColRow => "colrow",
        }
    }

    /// Column-major modes fill cells top-to-bottom before moving right
    pub fn is_column_major(&self) -> bool {
        matches!(self, LayoutMode::Col | LayoutMode::ColRow)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "row" => Ok(LayoutMode::Row),
            "col" => Ok(LayoutMode::Col),
            "rowcol" => Ok(LayoutMode::RowCol),
            "colrow" => Ok(LayoutMode::ColRow),
            other => Err(CoreError::InvalidModeOption {
                option: "layout",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-axis distance between adjacent grid cells
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Spacing {
    /// Spacing derived from the domain extent with the standard margin
    pub fn from_bounding_box(bbox: &BoundingBox) -> Self {
        let e = bbox.extent();
        Self {
            x: CELL_MARGIN * e[0],
            y: CELL_MARGIN * e[1],
            z: CELL_MARGIN * e[2],
        }
    }
}

/// One assigned grid cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Index of the field this cell holds
    pub index: usize,
    /// Grid row, 0 rendered at the top
    pub row: usize,
    /// Grid column, 0 rendered at the left
    pub col: usize,
    /// Scene-coordinate position of the cell origin
    pub position: [f64; 3],
}

/// Row/column counts for a field count under a layout mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub mode: LayoutMode,
    pub n_row: usize,
    pub n_col: usize,
}

impl LayoutSpec {
    /// Plan a grid for `n_data` fields
    ///
    /// The base layout aims for a square: `n_col = clamp(floor(sqrt(n)), 1,
    /// 5)`, `n_row = ceil(n / n_col)`. `Row` and `Col` force a single line;
    /// `ColRow` swaps the base counts. Always `n_row * n_col >= n_data`.
    pub fn plan(n_data: usize, mode: LayoutMode) -> Self {
        let n = n_data.max(1);
        let base_col = ((n as f64).sqrt().floor() as usize).clamp(1, MAX_AUTO_COLUMNS);
        let base_row = n.div_ceil(base_col);

        let (n_row, n_col) = match mode {
            LayoutMode::Row => (1, n),
            LayoutMode::Col => (n, 1),
            LayoutMode::RowCol => (base_row, base_col),
            LayoutMode::ColRow => (base_col, base_row),
        };
        Self { mode, n_row, n_col }
    }

    /// The grid cell assigned to a field index
    ///
    /// Row-major modes advance the column fastest; column-major modes the
    /// row. Row 0 renders at the top, so y decreases as the row grows.
    pub fn cell(&self, index: usize, spacing: Spacing) -> GridCell {
        let (row, col) = if self.mode.is_column_major() {
            (index % self.n_row.max(1), index / self.n_row.max(1))
        } else {
            (index / self.n_col.max(1), index % self.n_col.max(1))
        };

        GridCell {
            index,
            row,
            col,
            position: [
                spacing.x * col as f64,
                spacing.y * (self.n_row - row - 1) as f64,
                0.0,
            ],
        }
    }

    /// Total cell count, at least the planned field count
    pub fn capacity(&self) -> usize {
        self.n_row * self.n_col
    }
}

/// Suggested scene size in pixels for a layout mode
///
/// An explicit resolution always wins.
pub fn size_hint(mode: LayoutMode, resolution: Option<(u32, u32)>) -> (u32, u32) {
    if let Some(size) = resolution {
        return size;
    }
    match mode {
        LayoutMode::RowCol => (800, 600),
        LayoutMode::Row => (1000, 600),
        LayoutMode::Col => (600, 1000),
        LayoutMode::ColRow => (600, 800),
    }
}
