//! Spatial and temporal extents owned by a data source
//!
//! `BoundingBox` is the spatial domain of the mesh; `StepRange` is the
//! inclusive range of discrete time steps a source can materialize. Both are
//! read-only to the engine.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box of the spatial domain
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner
    pub min: [f64; 3],
    /// Maximum corner
    pub max: [f64; 3],
}

impl BoundingBox {
    /// Create a box from corners
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// A unit box with its minimum corner at the origin
    pub fn unit() -> Self {
        Self {
            min: [0.0; 3],
            max: [1.0; 3],
        }
    }

    /// Per-axis extent (max - min)
    pub fn extent(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Largest per-axis extent
    pub fn max_extent(&self) -> f64 {
        let e = self.extent();
        e[0].max(e[1]).max(e[2])
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::unit()
    }
}

/// Inclusive range of discrete time steps, `low <= high`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRange {
    /// First step
    pub low: i64,
    /// Last step (inclusive)
    pub high: i64,
}

impl StepRange {
    /// Create a range; callers must uphold `low <= high`
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// A range holding exactly one step
    pub fn single(step: i64) -> Self {
        Self {
            low: step,
            high: step,
        }
    }

    /// Number of steps in the range
    pub fn len(&self) -> usize {
        (self.high - self.low + 1).max(0) as usize
    }

    /// True for degenerate or inverted ranges
    pub fn is_empty(&self) -> bool {
        self.high < self.low
    }

    /// True when the source has more than one step to display
    pub fn has_multiple_steps(&self) -> bool {
        self.high > self.low
    }

    /// Whether a step lies within the range
    pub fn contains(&self, step: i64) -> bool {
        step >= self.low && step <= self.high
    }
}
