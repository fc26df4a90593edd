//! In-memory file source
//!
//! `MemorySource` implements `FileSource` over data held in memory. It is
//! the reference implementation used by engine tests and by embedders that
//! already have fields loaded.

use crate::geometry::{BoundingBox, StepRange};
use crate::schema::{FieldFamily, FieldIndex, FieldKind};
use crate::source::{FileSource, SourceError, SourceResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A `FileSource` over in-memory field enumerations
#[derive(Clone, Debug)]
pub struct MemorySource {
    index: FieldIndex,
    bbox: BoundingBox,
    steps: StepRange,
    current_step: i64,
    ranges: HashMap<String, (f64, f64)>,
    path: Option<PathBuf>,
}

impl MemorySource {
    /// Create a source with a unit bounding box and a single step
    pub fn new() -> Self {
        Self {
            index: FieldIndex::new(),
            bbox: BoundingBox::unit(),
            steps: StepRange::single(0),
            current_step: 0,
            ranges: HashMap::new(),
            path: None,
        }
    }

    /// Add a field name to a bucket
    pub fn with_field(
        mut self,
        family: FieldFamily,
        kind: FieldKind,
        name: impl Into<String>,
    ) -> Self {
        self.index.bucket_mut(family, kind).push(name.into());
        self
    }

    /// Set the bounding box
    pub fn with_bounding_box(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the step range
    pub fn with_steps(mut self, steps: StepRange) -> Self {
        self.steps = steps;
        self.current_step = steps.low;
        self
    }

    /// Record a data range for a named field
    pub fn with_range(mut self, name: impl Into<String>, range: (f64, f64)) -> Self {
        self.ranges.insert(name.into(), range);
        self
    }

    /// The step currently materialized
    pub fn current_step(&self) -> i64 {
        self.current_step
    }

    /// Recorded data range for a named field
    pub fn data_range(&self, name: &str) -> Option<(f64, f64)> {
        self.ranges.get(name).copied()
    }

    /// Replace the step range, as a file rewrite would
    pub fn replace_steps(&mut self, steps: StepRange) {
        self.steps = steps;
        self.current_step = self.current_step.clamp(steps.low, steps.high);
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSource for MemorySource {
    fn field_index(&self) -> SourceResult<FieldIndex> {
        Ok(self.index.clone())
    }

    fn bounding_box(&self) -> SourceResult<BoundingBox> {
        Ok(self.bbox)
    }

    fn step_range(&self) -> SourceResult<StepRange> {
        Ok(self.steps)
    }

    fn set_step(&mut self, step: i64) -> SourceResult<()> {
        if !self.steps.contains(step) {
            return Err(SourceError::StepOutOfRange {
                step,
                low: self.steps.low,
                high: self.steps.high,
            });
        }
        self.current_step = step;
        Ok(())
    }

    fn set_filename(&mut self, path: &Path) -> SourceResult<()> {
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
