//! File source trait and events
//!
//! The `FileSource` trait is the uniform interface the engine consumes to
//! read a simulation-result file: field enumeration, spatial bounds, and the
//! discrete time-step range. Implementations own parsing and file watching;
//! the engine only observes their effects.

use crate::geometry::{BoundingBox, StepRange};
use crate::schema::FieldIndex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by file sources
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to open file: {0}")]
    OpenFailed(String),

    #[error("step {step} outside range [{low}, {high}]")]
    StepOutOfRange { step: i64, low: i64, high: i64 },

    #[error("source error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// An explicit message emitted by a source when the underlying file changes
///
/// Delivering change notifications as values keeps re-rendering a caller
/// decision: handlers only update step bounds, they never touch the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceEvent {
    /// The file was rewritten and its step range recomputed
    StepBoundsChanged { range: StepRange },
}

/// Trait for time-varying simulation-result sources
///
/// All calls are blocking and expected to complete before the engine
/// proceeds; there is no internal parallelism.
pub trait FileSource {
    /// Enumerate available field names, per (family, kind) bucket
    fn field_index(&self) -> SourceResult<FieldIndex>;

    /// Bounding box of the spatial domain
    fn bounding_box(&self) -> SourceResult<BoundingBox>;

    /// Range of discrete time steps the source can materialize
    fn step_range(&self) -> SourceResult<StepRange>;

    /// Materialize the given step
    ///
    /// The value is not clamped by callers; out-of-range steps fail with
    /// whatever error the source defines.
    fn set_step(&mut self, step: i64) -> SourceResult<()>;

    /// Point the source at a different file
    fn set_filename(&mut self, path: &Path) -> SourceResult<()>;

    /// Current file path, if the source is file-backed
    fn path(&self) -> Option<&Path> {
        None
    }
}

/// A boxed source for dynamic dispatch
pub type BoxedSource = Box<dyn FileSource>;
