//! Viewer session
//!
//! A session ties the engine together for one source: it enumerates the
//! catalog, plans the grid, builds the pipeline, positions the camera, and
//! saves a snapshot or drives an animation. All configuration is explicit
//! in `SessionOptions`; there is no ambient global state, offscreen mode
//! included.
//!
//! Rebuilds are bracketed with `disable_render` / `enable_render`. A failed
//! build leaves redraws disabled so a partially-built scene is never shown.

use crate::animate::{self, SnapshotSink};
use crate::catalog::{self, CatalogFilter};
use crate::error::CoreResult;
use crate::layout::{self, LayoutMode, LayoutSpec};
use crate::pipeline::{self, PipelineOptions, ScalarBarEntry};
use crate::renderer::{NodeHandle, Renderer};
use crate::step::StepController;
use impanel_source::{FileSource, SourceEvent};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Default view angles (azimuth, elevation) for flat data
pub const VIEW_2D: (f64, f64) = (0.0, 0.0);

/// Default view angles for data with depth
pub const VIEW_3D: (f64, f64) = (45.0, 45.0);

/// Complete configuration of one visualization session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Grid layout mode
    pub layout: LayoutMode,

    /// Per-field rendering options
    pub pipeline: PipelineOptions,

    /// Which fields to catalog
    pub filter: CatalogFilter,

    /// Initial time step to display
    pub step: i64,

    /// Camera (azimuth, elevation); `None` picks a default from the data
    pub view: Option<(f64, f64)>,

    /// Camera roll, passed through to the backend
    pub roll: Option<f64>,

    /// Explicit scene resolution; `None` derives one from the layout
    pub resolution: Option<(u32, u32)>,

    /// File name for the saved scene figure
    pub fig_filename: String,

    /// Directory snapshots are written to
    pub output_dir: PathBuf,

    /// Save one snapshot per step instead of a single view
    pub animate: bool,

    /// Encode saved frames into this container format (e.g. "avi")
    pub anim_format: Option<String>,

    /// Encoder options; `None` uses the default
    pub ffmpeg_options: Option<String>,

    /// Render without a window; consumed by the embedding shell
    pub offscreen: bool,

    /// Save a snapshot automatically after a static render
    pub auto_screenshot: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            layout: LayoutMode::default(),
            pipeline: PipelineOptions::default(),
            filter: CatalogFilter::default(),
            step: 0,
            view: None,
            roll: None,
            resolution: None,
            fig_filename: "view.png".to_string(),
            output_dir: PathBuf::from("."),
            animate: false,
            anim_format: None,
            ffmpeg_options: None,
            offscreen: false,
            auto_screenshot: true,
        }
    }
}

/// One visualization session over a single source and scene
///
/// The scene is exclusively owned: only one rebuild is ever in flight.
#[derive(Debug)]
pub struct ViewerSession {
    options: SessionOptions,
    controller: Option<StepController>,
    scalar_bars: Vec<ScalarBarEntry>,
    is_3d_data: bool,
}

impl ViewerSession {
    /// Create a session from explicit options
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            controller: None,
            scalar_bars: Vec::new(),
            is_3d_data: false,
        }
    }

    /// Session configuration
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The step controller, present once a multi-step source is attached
    pub fn step_controller(&self) -> Option<&StepController> {
        self.controller.as_ref()
    }

    /// Color bars accumulated by the last build, retained for re-display
    pub fn scalar_bars(&self) -> &[ScalarBarEntry] {
        &self.scalar_bars
    }

    /// Whether the last built data had a meaningful z extent
    pub fn is_3d_data(&self) -> bool {
        self.is_3d_data
    }

    /// Suggested scene size for this session's layout
    pub fn size_hint(&self) -> (u32, u32) {
        layout::size_hint(self.options.layout, self.options.resolution)
    }

    /// Build the scene and save a snapshot or an animation
    ///
    /// `source_node` is the backend's handle for the opened file source.
    pub fn render<R, S, K>(
        &mut self,
        renderer: &mut R,
        source: &mut S,
        source_node: NodeHandle,
        sink: &mut K,
    ) -> CoreResult<()>
    where
        R: Renderer,
        S: FileSource + ?Sized,
        K: SnapshotSink + ?Sized,
    {
        let bounds = source.step_range()?;
        if self.controller.is_none() && bounds.has_multiple_steps() {
            let mut controller = StepController::attach(bounds, self.options.step);
            controller.set_step(self.options.step, source)?;
            self.controller = Some(controller);
        }

        renderer.disable_render();
        self.rebuild(renderer, source, source_node)?;

        let (azimuth, elevation) = self.options.view.unwrap_or({
            if self.options.pipeline.is_3d || self.is_3d_data {
                VIEW_3D
            } else {
                VIEW_2D
            }
        });
        renderer.set_view(azimuth, elevation, self.options.roll);
        renderer.reset_zoom();
        renderer.enable_render();

        if self.options.pipeline.show_scalar_bar {
            pipeline::show_scalar_bars(renderer, &self.scalar_bars);
        }

        if self.options.animate {
            self.save_animation(source, sink)?;
        } else if self.options.auto_screenshot {
            let filename = self.options.fig_filename.clone();
            self.save_image(sink, &filename)?;
        }
        Ok(())
    }

    /// Display a different step and rebuild the scene
    pub fn set_step<R, S>(
        &mut self,
        step: i64,
        renderer: &mut R,
        source: &mut S,
        source_node: NodeHandle,
    ) -> CoreResult<()>
    where
        R: Renderer,
        S: FileSource + ?Sized,
    {
        if let Some(controller) = self.controller.as_mut() {
            controller.set_step(step, source)?;
            renderer.disable_render();
            self.rebuild(renderer, source, source_node)?;
            renderer.enable_render();
        }
        Ok(())
    }

    /// Forward a source event to the step controller
    ///
    /// Bounds updates never re-render; call `render` explicitly when the new
    /// file should be shown.
    pub fn handle_event(&mut self, event: SourceEvent) {
        if let Some(controller) = self.controller.as_mut() {
            controller.handle_event(event);
        }
    }

    /// Save a snapshot of the current scene under the output directory
    pub fn save_image<K: SnapshotSink + ?Sized>(
        &self,
        sink: &mut K,
        filename: &str,
    ) -> CoreResult<PathBuf> {
        std::fs::create_dir_all(&self.options.output_dir)?;
        let path = self.options.output_dir.join(filename);
        info!(path = %path.display(), "saving snapshot");
        sink.save_image(&path)?;
        Ok(path)
    }

    fn rebuild<R, S>(
        &mut self,
        renderer: &mut R,
        source: &mut S,
        source_node: NodeHandle,
    ) -> CoreResult<()>
    where
        R: Renderer,
        S: FileSource + ?Sized,
    {
        let fields = catalog::enumerate(source, &self.options.filter)?;
        let bbox = source.bounding_box()?;
        self.is_3d_data = pipeline::is_3d_data(&bbox);

        let spec = LayoutSpec::plan(fields.len(), self.options.layout);
        self.scalar_bars = pipeline::build(
            renderer,
            source_node,
            &fields,
            &bbox,
            &spec,
            &self.options.pipeline,
        )?;
        Ok(())
    }

    /// Snapshot every step in the source's range, then hand the frames to
    /// the external encoder if a format was requested
    fn save_animation<S, K>(&mut self, source: &mut S, sink: &mut K) -> CoreResult<()>
    where
        S: FileSource + ?Sized,
        K: SnapshotSink + ?Sized,
    {
        let Some(controller) = self.controller.as_mut() else {
            // single-step source: an animation degenerates to one view
            let filename = self.options.fig_filename.clone();
            self.save_image(sink, &filename)?;
            return Ok(());
        };

        let range = source.step_range()?;
        let (stem, ext) = animate::split_figure_name(&self.options.fig_filename);
        std::fs::create_dir_all(&self.options.output_dir)?;
        let base = self.options.output_dir.join(stem).to_string_lossy().into_owned();

        let frames = animate::run(controller, source, range, &base, ext, sink)?;

        if let Some(format) = &self.options.anim_format {
            animate::encode_animation(
                &base,
                ext,
                frames.len(),
                format,
                self.options.ffmpeg_options.as_deref(),
            );
        }
        Ok(())
    }
}
