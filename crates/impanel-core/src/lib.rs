//! impanel-core - Automatic grid-panel visualization of simulation results
//!
//! Given a simulation-result source, impanel catalogs its named data fields
//! (scalar, vector, tensor; on points or cells), lays them out on an
//! automatic grid in a single 3D scene, and drives time-stepped playback and
//! animation export.
//!
//! # Key Components
//!
//! - **catalog**: field enumeration, ordering, and include/exclude filtering
//! - **layout**: grid planning and per-field scene positions
//! - **scale**: automatic glyph scale factors from data ranges
//! - **pipeline**: per-field backend operation sequences (the scene build)
//! - **step**: the current-step state machine for time-varying sources
//! - **animate**: per-step snapshot export and encoder hand-off
//! - **session**: one source, one scene, one explicit configuration
//!
//! The 3D backend and the file format are external collaborators behind the
//! `Renderer` trait (here) and the `FileSource` trait (`impanel-source`).
//! The engine is single-threaded and synchronous; rebuilds run to completion
//! or fail before the scene is shown.

pub mod animate;
pub mod catalog;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod scale;
pub mod session;
pub mod step;

pub use animate::{encode_animation, frame_digits, frame_name, SnapshotSink};
pub use catalog::{enumerate, CatalogFilter, DEFAULT_FILTER_NAMES};
pub use error::{CatalogError, CoreError, CoreResult, ScaleError};
pub use layout::{size_hint, GridCell, LayoutMode, LayoutSpec, Spacing};
pub use pipeline::{
    is_3d_data, PipelineOptions, ScalarBarEntry, ScalarModeSet, VectorModeSet,
};
pub use renderer::{
    ActorHandle, ColorBarHints, LutChannel, LutHandle, NodeHandle, Renderer, Representation,
};
pub use scale::{glyph_scale_factor, DEFAULT_REL_SCALING};
pub use session::{SessionOptions, ViewerSession};
pub use step::{StepController, StepState};

// Schema and geometry types are re-exported so embedders need only one
// import path.
pub use impanel_source::{
    BoundingBox, FieldDescriptor, FieldFamily, FieldIndex, FieldKind, FileSource, SourceEvent,
    StepRange,
};
