//! Animation orchestration
//!
//! Walks a step range, materializing each step and saving one snapshot per
//! step under a deterministic, lexicographically-sortable zero-padded name.
//! Encoding the frames into a video is handed to an external tool and is
//! best-effort: a missing encoder is logged, never raised, and the frames
//! stay on disk.

use crate::error::CoreResult;
use crate::step::StepController;
use impanel_source::{FileSource, StepRange};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Default encoder options passed to ffmpeg
pub const DEFAULT_FFMPEG_OPTIONS: &str = "-r 10 -sameq";

/// Sink for scene snapshots, called once per frame (or once for a static
/// view)
pub trait SnapshotSink {
    /// Save an image of the current scene to the given path
    fn save_image(&mut self, path: &Path) -> CoreResult<()>;
}

impl<F> SnapshotSink for F
where
    F: FnMut(&Path) -> CoreResult<()>,
{
    fn save_image(&mut self, path: &Path) -> CoreResult<()> {
        self(path)
    }
}

/// Minimal decimal width covering `n_frames` values
///
/// 10 to 99 frames pad to two digits, 100 to 999 to three, and so on.
pub fn frame_digits(n_frames: usize) -> usize {
    let mut digits = 1;
    let mut rest = n_frames / 10;
    while rest > 0 {
        digits += 1;
        rest /= 10;
    }
    digits
}

/// Zero-padded frame file name: `base.STEP.ext`
pub fn frame_name(base: &str, step: i64, width: usize, ext: &str) -> String {
    format!("{base}.{step:0width$}.{ext}")
}

/// The `%0Nd` input pattern matching the names `frame_name` produces
pub fn frame_pattern(base: &str, width: usize, ext: &str) -> String {
    format!("{base}.%0{width}d.{ext}")
}

/// Split a figure file name into stem and extension
///
/// `"view.png"` becomes `("view", "png")`; a missing extension defaults to
/// `"png"`.
pub fn split_figure_name(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() => (base, ext),
        _ => (filename, "png"),
    }
}

/// Materialize every step in `range`, ascending, and snapshot each one
///
/// The live scene tracks the source, so materializing a step refreshes the
/// displayed frame before the snapshot is taken. Returns the frame paths in
/// order.
pub fn run<S, K>(
    controller: &mut StepController,
    source: &mut S,
    range: StepRange,
    base: &str,
    ext: &str,
    sink: &mut K,
) -> CoreResult<Vec<PathBuf>>
where
    S: FileSource + ?Sized,
    K: SnapshotSink + ?Sized,
{
    let width = frame_digits(range.len());
    let mut frames = Vec::with_capacity(range.len());

    for step in range.low..=range.high {
        let name = frame_name(base, step, width, ext);
        info!(step, frame = %name, "saving animation frame");

        controller.set_step(step, source)?;
        sink.save_image(Path::new(&name))?;
        frames.push(PathBuf::from(name));
    }

    Ok(frames)
}

/// Encode saved frames into `base.format` with ffmpeg
///
/// Failure is non-fatal: it is logged as a warning and `None` is returned,
/// leaving the frames on disk.
pub fn encode_animation(
    base: &str,
    ext: &str,
    n_frames: usize,
    format: &str,
    options: Option<&str>,
) -> Option<PathBuf> {
    let pattern = frame_pattern(base, frame_digits(n_frames), ext);
    let output = format!("{base}.{format}");
    let options = options.unwrap_or(DEFAULT_FFMPEG_OPTIONS);

    info!(%output, %pattern, "creating animation");
    let status = Command::new("ffmpeg")
        .args(options.split_whitespace())
        .arg("-i")
        .arg(&pattern)
        .arg(&output)
        .status();

    match status {
        Ok(status) if status.success() => Some(PathBuf::from(output)),
        Ok(status) => {
            warn!(%status, "animation not created; frames remain on disk");
            None
        }
        Err(err) => {
            warn!(%err, "animation not created, is ffmpeg installed?");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impanel_source::MemorySource;

    #[test]
    fn test_frame_digits() {
        assert_eq!(frame_digits(1), 1);
        assert_eq!(frame_digits(9), 1);
        assert_eq!(frame_digits(10), 2);
        assert_eq!(frame_digits(99), 2);
        assert_eq!(frame_digits(100), 3);
    }

    #[test]
    fn test_frame_name_padding() {
        assert_eq!(frame_name("out", 3, 2, "png"), "out.03.png");
        assert_eq!(frame_name("out", 12, 2, "png"), "out.12.png");
        assert_eq!(frame_pattern("out", 2, "png"), "out.%02d.png");
    }

    #[test]
    fn test_split_figure_name() {
        assert_eq!(split_figure_name("view.png"), ("view", "png"));
        assert_eq!(split_figure_name("view"), ("view", "png"));
        assert_eq!(split_figure_name("a.b.jpg"), ("a.b", "jpg"));
    }

    #[test]
    fn test_run_snapshots_every_step_ascending() {
        let range = StepRange::new(3, 12);
        let mut source = MemorySource::new().with_steps(range);
        let mut controller = StepController::attach(range, range.low);

        let mut saved: Vec<String> = Vec::new();
        let mut sink = |path: &Path| -> CoreResult<()> {
            saved.push(path.to_string_lossy().into_owned());
            Ok(())
        };

        let frames = run(&mut controller, &mut source, range, "out", "png", &mut sink).unwrap();

        assert_eq!(frames.len(), 10);
        assert_eq!(saved.len(), 10);
        assert_eq!(saved.first().unwrap(), "out.03.png");
        assert_eq!(saved.last().unwrap(), "out.12.png");
        let mut sorted = saved.clone();
        sorted.sort();
        assert_eq!(saved, sorted, "frame names sort lexicographically");
        assert_eq!(source.current_step(), 12);
    }

    #[test]
    fn test_run_propagates_sink_failure() {
        let range = StepRange::new(0, 2);
        let mut source = MemorySource::new().with_steps(range);
        let mut controller = StepController::attach(range, 0);

        let mut sink = |_path: &Path| -> CoreResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        };
        assert!(run(&mut controller, &mut source, range, "out", "png", &mut sink).is_err());
    }
}
