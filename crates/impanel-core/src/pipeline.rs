//! Render pipeline builder
//!
//! Walks an ordered field catalog and, for each field, drives the backend
//! through a deterministic sequence of operations: attribute activation,
//! visual representation by kind, then optional range/color-bar/label
//! decoration. Grid positions come from the layout planner, glyph scales
//! from the scale calculator.
//!
//! A build either runs to completion or fails outright; callers must not
//! display a scene whose build returned an error.

use crate::catalog;
use crate::error::{CoreError, CoreResult};
use crate::layout::{LayoutSpec, Spacing};
use crate::renderer::{
    ColorBarHints, LutChannel, LutHandle, NodeHandle, Renderer, Representation, ISO_CONTOURS,
    MESH_COLOR, TEXT_COLOR,
};
use crate::scale::glyph_scale_factor;
use impanel_source::{BoundingBox, FieldDescriptor, FieldFamily, FieldKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::debug;

/// Relative text widths at or below this are treated as "labels disabled"
pub const LABEL_WIDTH_EPS: f64 = 10.0 * f64::EPSILON;

/// Default relative label text width
pub const DEFAULT_REL_TEXT_WIDTH: f64 = 0.02;

/// Cut-plane opacity, per plane
const CUT_PLANE_OPACITY: f64 = 0.5;

/// Iso-surface opacity
const ISO_SURFACE_OPACITY: f64 = 0.3;

/// How scalars (and tensor magnitudes) are drawn in 3D mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarModeSet {
    /// Three orthogonal cut planes
    pub cut_plane: bool,
    /// Iso-surface with the standard contour count
    pub iso_surface: bool,
}

impl Default for ScalarModeSet {
    fn default() -> Self {
        Self {
            cut_plane: false,
            iso_surface: true,
        }
    }
}

impl FromStr for ScalarModeSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "cut_plane" => Ok(Self {
                cut_plane: true,
                iso_surface: false,
            }),
            "iso_surface" => Ok(Self {
                cut_plane: false,
                iso_surface: true,
            }),
            "both" => Ok(Self {
                cut_plane: true,
                iso_surface: true,
            }),
            other => Err(CoreError::InvalidModeOption {
                option: "scalar_mode",
                value: other.to_string(),
            }),
        }
    }
}

/// How vectors are drawn; any non-empty subset of arrows/warp/norm
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorModeSet {
    /// Oriented, tail-anchored glyphs
    pub arrows: bool,
    /// Geometry displaced by the vector field
    pub warp: bool,
    /// Magnitude surface
    pub norm: bool,
}

impl Default for VectorModeSet {
    fn default() -> Self {
        Self {
            arrows: true,
            warp: false,
            norm: true,
        }
    }
}

impl FromStr for VectorModeSet {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, CoreError> {
        let (arrows, warp, norm) = match s {
            "arrows" => (true, false, false),
            "warp" => (false, true, false),
            "norm" => (false, false, true),
            "arrows_norm" => (true, false, true),
            "warp_norm" => (false, true, true),
            other => {
                return Err(CoreError::InvalidModeOption {
                    option: "vector_mode",
                    value: other.to_string(),
                })
            }
        };
        Ok(Self { arrows, warp, norm })
    }
}

/// Per-build options for the pipeline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Use cut planes / iso-surfaces instead of flat surfaces
    pub is_3d: bool,

    /// Scalar display submodes
    pub scalar_mode: ScalarModeSet,

    /// Vector display submodes
    pub vector_mode: VectorModeSet,

    /// Relative glyph scaling; `None` uses the calculator default
    pub rel_scaling: Option<f64>,

    /// Clamp glyph sizes to the data range
    pub clamping: bool,

    /// Explicit per-field (min, max) overrides for color/glyph ranges
    pub ranges: HashMap<String, (f64, f64)>,

    /// Accumulate a color-bar entry per field
    pub show_scalar_bar: bool,

    /// Relative label width; non-positive or near-zero disables labels
    pub rel_text_width: f64,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            is_3d: false,
            scalar_mode: ScalarModeSet::default(),
            vector_mode: VectorModeSet::default(),
            rel_scaling: None,
            clamping: false,
            ranges: HashMap::new(),
            show_scalar_bar: false,
            rel_text_width: DEFAULT_REL_TEXT_WIDTH,
        }
    }
}

/// One accumulated color-bar, consumed at display time and retained for
/// re-display after a scene reset
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarBarEntry {
    pub family: FieldFamily,
    pub name: String,
    pub lut: LutHandle,
}

/// Whether the domain has a meaningful z extent
pub fn is_3d_data(bbox: &BoundingBox) -> bool {
    Spacing::from_bounding_box(bbox).z.abs() > LABEL_WIDTH_EPS
}

/// Build the scene for an ordered field catalog
///
/// Returns the accumulated color-bar entries, one per field when
/// `show_scalar_bar` is set. An empty catalog renders the bare mesh plus a
/// wireframe overlay at the origin.
pub fn build<R: Renderer>(
    renderer: &mut R,
    source: NodeHandle,
    catalog: &[FieldDescriptor],
    bbox: &BoundingBox,
    layout: &LayoutSpec,
    options: &PipelineOptions,
) -> CoreResult<Vec<ScalarBarEntry>> {
    if catalog.is_empty() {
        build_bare_mesh(renderer, source);
        return Ok(Vec::new());
    }

    let spacing = Spacing::from_bounding_box(bbox);
    let max_label_width = catalog::max_label_width(catalog);

    // Cell data is interpolated to points once and the node shared by every
    // cell-family vector/tensor field.
    let needs_ctp = catalog
        .iter()
        .any(|f| f.family == FieldFamily::Cell && f.kind != FieldKind::Scalar);
    let ctp = needs_ctp.then(|| renderer.interpolate_cell_to_point(source));

    let mut scalar_bars = Vec::new();

    for (index, field) in catalog.iter().enumerate() {
        let cell = layout.cell(index, spacing);
        let mut position = cell.position;
        debug!(field = %field, row = cell.row, col = cell.col, ?position, "placing field");

        let explicit_range = options.ranges.get(&field.name).copied();
        let mut is_magnitude = false;

        let (display, channel) = match field.kind {
            FieldKind::Scalar => {
                let active = renderer.activate_attribute(source, field);
                render_scalar(renderer, active, position, options);
                (active, LutChannel::Scalar)
            }

            FieldKind::Vector => {
                let base = point_base(field, source, ctp);
                let mut active = renderer.activate_attribute(base, &field.as_point());

                // An explicit range overrides the auto-computed factor for
                // every submode that scales.
                let sf_override = explicit_range
                    .map(|range| glyph_scale_factor(range, options.rel_scaling, bbox))
                    .transpose()?;

                if options.vector_mode.arrows {
                    let sf = match sf_override {
                        Some(sf) => sf,
                        None => glyph_scale_factor(
                            renderer.data_range(active, LutChannel::Vector),
                            options.rel_scaling,
                            bbox,
                        )?,
                    };
                    renderer.create_glyphs(active, position, bbox, sf, options.clamping, None);
                }

                if options.vector_mode.warp {
                    active = renderer.warp_vector(active, sf_override);
                }

                if options.vector_mode.norm {
                    active = renderer.extract_vector_norm(active);
                    let opacity = if options.vector_mode.arrows { 0.3 } else { 1.0 };
                    renderer.create_surface(active, position, opacity);
                }

                (active, LutChannel::Vector)
            }

            FieldKind::Tensor => {
                let base = point_base(field, source, ctp);
                let active = renderer.activate_attribute(base, &field.as_point());
                let component = renderer.extract_tensor_component(active);
                is_magnitude = true;
                render_scalar(renderer, component, position, options);
                (component, LutChannel::Scalar)
            }
        };

        if explicit_range.is_some() || options.show_scalar_bar {
            let lut = renderer.lookup_table(display, channel);

            if let Some(range) = explicit_range {
                renderer.set_lut_range(lut, range);
            }

            if options.show_scalar_bar {
                scalar_bars.push(ScalarBarEntry {
                    family: field.family,
                    name: field.name.clone(),
                    lut,
                });
            }
        }

        if options.rel_text_width > LABEL_WIDTH_EPS {
            position[2] = 0.5 * spacing.z;
            let label = if is_magnitude {
                format!("|{}|", field.name)
            } else {
                field.name.clone()
            };
            let width = options.rel_text_width * label.len() as f64 / max_label_width as f64;
            renderer.create_text(position, &label, width, TEXT_COLOR);
        }
    }

    Ok(scalar_bars)
}

/// Display the accumulated color bars, stacked from the top-left corner
pub fn show_scalar_bars<R: Renderer>(renderer: &mut R, bars: &[ScalarBarEntry]) {
    for (slot, bar) in bars.iter().enumerate() {
        let hints = ColorBarHints::stacked(slot, format!("{}: {}", bar.family, bar.name));
        renderer.show_color_bar(bar.lut, &hints);
    }
}

/// Vector/tensor attributes live on points; cell fields go through the
/// shared interpolation node first.
fn point_base(field: &FieldDescriptor, source: NodeHandle, ctp: Option<NodeHandle>) -> NodeHandle {
    match field.family {
        FieldFamily::Point => source,
        FieldFamily::Cell => ctp.expect("cell-to-point node built for cell fields"),
    }
}

/// Scalar (and tensor-component) representation: cut planes and/or an
/// iso-surface in 3D mode, a plain surface otherwise.
fn render_scalar<R: Renderer>(
    renderer: &mut R,
    node: NodeHandle,
    position: [f64; 3],
    options: &PipelineOptions,
) {
    if options.is_3d {
        if options.scalar_mode.cut_plane {
            renderer.create_cut_plane(node, position, [1.0, 0.0, 0.0], CUT_PLANE_OPACITY);
            renderer.create_cut_plane(node, position, [0.0, 1.0, 0.0], CUT_PLANE_OPACITY);
            renderer.create_cut_plane(node, position, [0.0, 0.0, 1.0], CUT_PLANE_OPACITY);
        }
        if options.scalar_mode.iso_surface {
            renderer.create_iso_surface(node, position, ISO_CONTOURS, ISO_SURFACE_OPACITY);
        }
    } else {
        renderer.create_surface(node, position, 1.0);
    }
}

/// No fields to show: render the undecorated domain geometry once, plus a
/// wireframe overlay, centered at the origin.
fn build_bare_mesh<R: Renderer>(renderer: &mut R, source: NodeHandle) {
    let origin = [0.0, 0.0, 0.0];
    let surface = renderer.create_surface(source, origin, 1.0);
    renderer.set_actor_color(surface, MESH_COLOR);

    let overlay = renderer.create_surface(source, origin, 1.0);
    renderer.set_representation(overlay, Representation::Wireframe);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaleError;
    use crate::layout::LayoutMode;
    use crate::renderer::recording::{RecordingRenderer, RenderOp};

    const SOURCE: NodeHandle = NodeHandle(0);

    fn field(family: FieldFamily, kind: FieldKind, name: &str) -> FieldDescriptor {
        FieldDescriptor::new(family, kind, name)
    }

    fn build_with(
        catalog: &[FieldDescriptor],
        options: &PipelineOptions,
        renderer: &mut RecordingRenderer,
    ) -> CoreResult<usize> {
        let bbox = BoundingBox::unit();
        let layout = LayoutSpec::plan(catalog.len(), LayoutMode::RowCol);
        build(renderer, SOURCE, catalog, &bbox, &layout, options).map(|bars| bars.len())
    }

    #[test]
    fn test_scalar_2d_renders_surface() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Scalar, "t")];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::Surface { opacity, .. } if *opacity == 1.0)),
            1
        );
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::ActivateAttribute { attribute, .. } if attribute == "point_scalars_t"
            )),
            1
        );
    }

    #[test]
    fn test_scalar_3d_both_modes() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Scalar, "t")];
        let options = PipelineOptions {
            is_3d: true,
            scalar_mode: "both".parse().unwrap(),
            ..Default::default()
        };
        build_with(&catalog, &options, &mut renderer).unwrap();

        assert_eq!(
            renderer.count(
                |op| matches!(op, RenderOp::CutPlane { opacity, .. } if *opacity == 0.5)
            ),
            3
        );
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::IsoSurface { contours, opacity, .. }
                    if *contours == ISO_CONTOURS && *opacity == 0.3
            )),
            1
        );
        assert_eq!(renderer.count(|op| matches!(op, RenderOp::Surface { .. })), 0);
    }

    #[test]
    fn test_vector_arrows_norm() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Vector, "u")];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(renderer.count(|op| matches!(op, RenderOp::Glyphs { .. })), 1);
        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::ExtractVectorNorm { .. })),
            1
        );
        // norm surface dimmed because arrows are shown too
        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::Surface { opacity, .. } if *opacity == 0.3)),
            1
        );
    }

    #[test]
    fn test_vector_norm_only_is_opaque() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Vector, "u")];
        let options = PipelineOptions {
            vector_mode: "norm".parse().unwrap(),
            ..Default::default()
        };
        build_with(&catalog, &options, &mut renderer).unwrap();

        assert_eq!(renderer.count(|op| matches!(op, RenderOp::Glyphs { .. })), 0);
        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::Surface { opacity, .. } if *opacity == 1.0)),
            1
        );
    }

    #[test]
    fn test_warp_norm_chains_through_warp() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Vector, "u")];
        let options = PipelineOptions {
            vector_mode: "warp_norm".parse().unwrap(),
            ..Default::default()
        };
        build_with(&catalog, &options, &mut renderer).unwrap();

        let warp_pos = renderer
            .ops
            .iter()
            .position(|op| matches!(op, RenderOp::WarpVector { .. }))
            .unwrap();
        let norm_pos = renderer
            .ops
            .iter()
            .position(|op| matches!(op, RenderOp::ExtractVectorNorm { .. }))
            .unwrap();
        assert!(warp_pos < norm_pos);
    }

    #[test]
    fn test_cell_fields_share_interpolation_node() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [
            field(FieldFamily::Cell, FieldKind::Vector, "flux"),
            field(FieldFamily::Cell, FieldKind::Tensor, "stress"),
        ];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::InterpolateCellToPoint { .. })),
            1
        );
        // both activations address the point-family attribute
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::ActivateAttribute { attribute, .. } if attribute.starts_with("point_")
            )),
            2
        );
    }

    #[test]
    fn test_cell_scalar_skips_interpolation() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Cell, FieldKind::Scalar, "mat")];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::InterpolateCellToPoint { .. })),
            0
        );
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::ActivateAttribute { attribute, .. } if attribute == "cell_scalars_mat"
            )),
            1
        );
    }

    #[test]
    fn test_tensor_extracts_component_and_labels_magnitude() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Tensor, "stress")];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::ExtractTensorComponent { .. })),
            1
        );
        assert_eq!(
            renderer.count(
                |op| matches!(op, RenderOp::Text { text, .. } if text == "|stress|")
            ),
            1
        );
    }

    #[test]
    fn test_explicit_range_overrides_auto_scale() {
        let mut renderer = RecordingRenderer::new();
        // auto range would give a different factor
        renderer.default_range = (0.0, 1.0);
        let catalog = [field(FieldFamily::Point, FieldKind::Vector, "u")];
        let options = PipelineOptions {
            vector_mode: "arrows".parse().unwrap(),
            ranges: [("u".to_string(), (0.0, 2.0))].into(),
            ..Default::default()
        };
        build_with(&catalog, &options, &mut renderer).unwrap();

        // 0.02 * 1.0 / 2.0 from the explicit range, not 0.02 from the auto one
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::Glyphs { scale_factor, .. } if (*scale_factor - 0.01).abs() < 1e-12
            )),
            1
        );
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::SetLutRange { range, .. } if *range == (0.0, 2.0)
            )),
            1
        );
    }

    #[test]
    fn test_degenerate_auto_range_fails_build() {
        let mut renderer = RecordingRenderer::new();
        renderer.default_range = (3.0, 3.0);
        let catalog = [field(FieldFamily::Point, FieldKind::Vector, "u")];
        let err = build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Scale(ScaleError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_scalar_bars_accumulated_per_field() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [
            field(FieldFamily::Point, FieldKind::Scalar, "t"),
            field(FieldFamily::Cell, FieldKind::Scalar, "p"),
        ];
        let options = PipelineOptions {
            show_scalar_bar: true,
            ..Default::default()
        };
        let bbox = BoundingBox::unit();
        let layout = LayoutSpec::plan(2, LayoutMode::RowCol);
        let bars = build(&mut renderer, SOURCE, &catalog, &bbox, &layout, &options).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].family, FieldFamily::Point);
        assert_eq!(bars[0].name, "t");

        show_scalar_bars(&mut renderer, &bars);
        assert_eq!(
            renderer.count(
                |op| matches!(op, RenderOp::ShowColorBar { title, .. } if title == "point: t")
            ),
            1
        );
    }

    #[test]
    fn test_labels_disabled_by_zero_width() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [field(FieldFamily::Point, FieldKind::Scalar, "t")];
        let options = PipelineOptions {
            rel_text_width: 0.0,
            ..Default::default()
        };
        build_with(&catalog, &options, &mut renderer).unwrap();
        assert_eq!(renderer.count(|op| matches!(op, RenderOp::Text { .. })), 0);
    }

    #[test]
    fn test_label_width_proportional_to_name() {
        let mut renderer = RecordingRenderer::new();
        let catalog = [
            field(FieldFamily::Point, FieldKind::Scalar, "temperature"),
            field(FieldFamily::Point, FieldKind::Scalar, "p"),
        ];
        build_with(&catalog, &PipelineOptions::default(), &mut renderer).unwrap();

        // max_label_width = 11 + 2 = 13
        let widths: Vec<f64> = renderer
            .ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::Text { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(widths.len(), 2);
        assert!((widths[0] - 0.02 * 11.0 / 13.0).abs() < 1e-12);
        assert!((widths[1] - 0.02 * 1.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_catalog_renders_bare_mesh() {
        let mut renderer = RecordingRenderer::new();
        let bars = build_with(&[], &PipelineOptions::default(), &mut renderer).unwrap();

        assert_eq!(bars, 0);
        assert_eq!(renderer.count(|op| matches!(op, RenderOp::Surface { .. })), 2);
        assert_eq!(
            renderer.count(|op| matches!(
                op,
                RenderOp::SetRepresentation { representation: Representation::Wireframe }
            )),
            1
        );
        assert_eq!(
            renderer.count(|op| matches!(op, RenderOp::SetActorColor { color } if *color == MESH_COLOR)),
            1
        );
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "both".parse::<ScalarModeSet>().unwrap(),
            ScalarModeSet {
                cut_plane: true,
                iso_surface: true
            }
        );
        assert_eq!(
            "arrows_norm".parse::<VectorModeSet>().unwrap(),
            VectorModeSet {
                arrows: true,
                warp: false,
                norm: true
            }
        );
        assert!("streamlines".parse::<ScalarModeSet>().is_err());
        assert!("ribbons".parse::<VectorModeSet>().is_err());
    }

    #[test]
    fn test_is_3d_data() {
        assert!(!is_3d_data(&BoundingBox::new([0.0; 3], [1.0, 1.0, 0.0])));
        assert!(is_3d_data(&BoundingBox::unit()));
    }
}
