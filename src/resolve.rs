//! Display-space to source-space conversion for the confirmed selection.

use crate::geometry::{CropBox, SelectionRect};
use crate::scale::ScaleResult;

/// Maps `rect` back onto the source image.
///
/// Each corner is divided by the display scale and rounded, then clamped to
/// `[0, source_width] x [0, source_height]`. Returns `None` when the clamped box
/// has no area, which callers treat as a cancelled session. Boxes one pixel wide
/// or tall are kept.
pub fn resolve(
    rect: SelectionRect,
    scale: &ScaleResult,
    source_width: u32,
    source_height: u32,
) -> Option<CropBox> {
    let inv = 1.0 / scale.scale;
    let to_source = |v: i32, limit: u32| -> u32 {
        let scaled = (v as f64 * inv).round();
        scaled.clamp(0.0, limit as f64) as u32
    };

    let crop = CropBox {
        x1: to_source(rect.x1, source_width),
        y1: to_source(rect.y1, source_height),
        x2: to_source(rect.x2, source_width),
        y2: to_source(rect.y2, source_height),
    };

    if crop.x2 <= crop.x1 || crop.y2 <= crop.y1 {
        return None;
    }
    Some(crop)
}
