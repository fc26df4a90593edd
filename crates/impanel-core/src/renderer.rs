//! Renderer capability trait
//!
//! The engine drives an external 3D scene-graph backend through this trait.
//! Pipeline nodes (attribute activations, interpolations, extractions) and
//! actors (surfaces, glyphs, text) are referenced by opaque handles; the
//! backend owns the actual objects.
//!
//! All calls are blocking and synchronous. Rebuilds are bracketed with
//! `disable_render` / `enable_render` so the backend never shows a partial
//! frame.

use impanel_source::{BoundingBox, FieldDescriptor};
use serde::{Deserialize, Serialize};

/// Handle to a pipeline node (data source or derived filter)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// Handle to a scene actor (surface, cut plane, glyphs, text)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u64);

/// Handle to a lookup table (value-to-color mapping)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LutHandle(pub u64);

/// Which lookup table of a node to address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LutChannel {
    /// Scalar coloring (scalars, tensor components)
    Scalar,
    /// Vector coloring (glyphs, warps)
    Vector,
}

/// Surface drawing style
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Representation {
    Surface,
    Wireframe,
}

/// Flat gray used for the bare mesh when no fields are shown
pub const MESH_COLOR: [f64; 3] = [0.8, 0.8, 0.8];

/// Label text color
pub const TEXT_COLOR: [f64; 3] = [0.0, 0.0, 0.0];

/// Iso-surface contour count
pub const ISO_CONTOURS: u32 = 10;

/// On-screen placement of one color bar
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorBarHints {
    /// Lower-left corner in normalized viewport coordinates
    pub position: (f64, f64),
    /// Width and height in normalized viewport coordinates
    pub size: (f64, f64),
    /// Number of tick labels
    pub label_count: u32,
    /// Bar title, "family: name"
    pub title: String,
    /// Title font size in points
    pub title_font_size: u32,
    /// Tick label font size in points
    pub label_font_size: u32,
}

impl ColorBarHints {
    /// Horizontal bar in the `slot`-th position of a top-left stack
    pub fn stacked(slot: usize, title: impl Into<String>) -> Self {
        Self {
            position: (0.03, 1.0 - 0.01 - slot as f64 / 15.0 - 0.07),
            size: (0.4, 0.07),
            label_count: 5,
            title: title.into(),
            title_font_size: 20,
            label_font_size: 16,
        }
    }
}

/// Capabilities the engine consumes from a 3D rendering backend
pub trait Renderer {
    /// Suspend redraws for a batch rebuild
    fn disable_render(&mut self);

    /// Resume redraws after a batch rebuild
    fn enable_render(&mut self);

    /// Activate a named attribute on a node, returning the derived node
    fn activate_attribute(&mut self, node: NodeHandle, field: &FieldDescriptor) -> NodeHandle;

    /// Interpolate cell data onto points, returning the derived node
    fn interpolate_cell_to_point(&mut self, node: NodeHandle) -> NodeHandle;

    /// Warp geometry by the active vector field; `scale` of `None` keeps
    /// the backend default
    fn warp_vector(&mut self, node: NodeHandle, scale: Option<f64>) -> NodeHandle;

    /// Derive the magnitude of the active vector field
    fn extract_vector_norm(&mut self, node: NodeHandle) -> NodeHandle;

    /// Reduce the active tensor field to a displayable scalar component
    fn extract_tensor_component(&mut self, node: NodeHandle) -> NodeHandle;

    /// Data range of the node's active attribute on a channel
    fn data_range(&self, node: NodeHandle, channel: LutChannel) -> (f64, f64);

    /// Add a surface actor
    fn create_surface(&mut self, node: NodeHandle, position: [f64; 3], opacity: f64)
        -> ActorHandle;

    /// Add a planar cut through the active scalar field
    fn create_cut_plane(
        &mut self,
        node: NodeHandle,
        position: [f64; 3],
        normal: [f64; 3],
        opacity: f64,
    ) -> ActorHandle;

    /// Add an iso-surface of the active scalar field
    fn create_iso_surface(
        &mut self,
        node: NodeHandle,
        position: [f64; 3],
        contours: u32,
        opacity: f64,
    ) -> ActorHandle;

    /// Add tail-anchored oriented glyphs for the active vector field
    fn create_glyphs(
        &mut self,
        node: NodeHandle,
        position: [f64; 3],
        bbox: &BoundingBox,
        scale_factor: f64,
        clamping: bool,
        color: Option<[f64; 3]>,
    ) -> ActorHandle;

    /// Add a text label at a scene position; `width` is relative to the
    /// viewport
    fn create_text(
        &mut self,
        position: [f64; 3],
        text: &str,
        width: f64,
        color: [f64; 3],
    ) -> ActorHandle;

    /// Change an actor's drawing style
    fn set_representation(&mut self, actor: ActorHandle, representation: Representation);

    /// Override an actor's flat color
    fn set_actor_color(&mut self, actor: ActorHandle, color: [f64; 3]);

    /// Lookup table of the node's most recent module on a channel
    fn lookup_table(&mut self, node: NodeHandle, channel: LutChannel) -> LutHandle;

    /// Pin a lookup table to an explicit range, disabling auto-ranging
    fn set_lut_range(&mut self, lut: LutHandle, range: (f64, f64));

    /// Display a color-bar legend for a lookup table
    fn show_color_bar(&mut self, lut: LutHandle, hints: &ColorBarHints);

    /// Move the camera; values are passed through untouched
    fn set_view(&mut self, azimuth: f64, elevation: f64, roll: Option<f64>);

    /// Re-fit the camera zoom to the scene
    fn reset_zoom(&mut self);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_bar_hints_stack_downwards() {
        let first = ColorBarHints::stacked(0, "point: temperature");
        let second = ColorBarHints::stacked(1, "cell: pressure");
        assert_eq!(first.position.0, second.position.0);
        assert!(first.position.1 > second.position.1);
        assert_eq!(first.label_count, 5);
    }
}
