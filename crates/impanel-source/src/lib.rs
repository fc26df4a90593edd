//! impanel-source - Data source boundary for simulation-result files
//!
//! This crate defines what the impanel engine needs from a result file:
//!
//! - **Schema**: named fields classified by family (point/cell) and kind
//!   (scalars/vectors/tensors)
//! - **Geometry**: the spatial bounding box and the discrete step range
//! - **FileSource**: the trait concrete readers implement
//! - **MemorySource**: an in-memory implementation for tests and embedders
//!
//! # Design
//!
//! File parsing and filesystem watching live behind the `FileSource` trait;
//! the engine only consumes enumerations and events. Change notifications
//! are explicit `SourceEvent` values, never callbacks that mutate the scene.

pub mod geometry;
pub mod memory;
pub mod schema;
pub mod source;

pub use geometry::*;
pub use memory::*;
pub use schema::*;
pub use source::*;
