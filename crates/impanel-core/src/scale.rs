//! Automatic glyph scale factors
//!
//! Maps a field's data range and the domain extent to a glyph scale factor,
//! so arrows and warps stay readable regardless of data magnitude.

use crate::error::{ScaleError, ScaleResult};
use impanel_source::BoundingBox;

/// Default relative scaling: the maximal data value fits 50 times into the
/// largest domain extent.
pub const DEFAULT_REL_SCALING: f64 = 0.02;

/// Compute the glyph scale factor for a data range within a domain
///
/// `scale = rel_scaling * max_extent(bbox) / (range.1 - range.0)`. A zero
/// width range is a defined error rather than a silent NaN; callers must
/// supply an explicit range for constant fields.
pub fn glyph_scale_factor(
    range: (f64, f64),
    rel_scaling: Option<f64>,
    bbox: &BoundingBox,
) -> ScaleResult<f64> {
    let delta = range.1 - range.0;
    if delta == 0.0 {
        return Err(ScaleError::DegenerateRange { value: range.0 });
    }
    let rel_scaling = rel_scaling.unwrap_or(DEFAULT_REL_SCALING);
    Ok(rel_scaling * bbox.max_extent() / delta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rel_scaling() {
        let bbox = BoundingBox::new([0.0; 3], [10.0, 1.0, 1.0]);
        let sf = glyph_scale_factor((0.0, 2.0), None, &bbox).unwrap();
        // 0.02 * 10 / 2
        assert!((sf - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_explicit_rel_scaling() {
        let bbox = BoundingBox::unit();
        let sf = glyph_scale_factor((0.0, 4.0), Some(0.5), &bbox).unwrap();
        assert!((sf - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_invariant_under_compensating_scaling() {
        // Scaling the bbox by k and rel_scaling by 1/k leaves the factor
        // unchanged.
        let range = (1.0, 3.0);
        let bbox = BoundingBox::new([0.0; 3], [2.0, 1.0, 1.0]);
        let scaled = BoundingBox::new([0.0; 3], [8.0, 4.0, 4.0]);

        let a = glyph_scale_factor(range, Some(0.4), &bbox).unwrap();
        let b = glyph_scale_factor(range, Some(0.1), &scaled).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_fails() {
        let bbox = BoundingBox::unit();
        let err = glyph_scale_factor((2.5, 2.5), None, &bbox).unwrap_err();
        assert!(matches!(err, ScaleError::DegenerateRange { value } if value == 2.5));
    }

    #[test]
    fn test_nonzero_range_never_fails() {
        let bbox = BoundingBox::unit();
        assert!(glyph_scale_factor((0.0, 1e-300), None, &bbox).is_ok());
        assert!(glyph_scale_factor((-1.0, 1.0), None, &bbox).is_ok());
    }
}
