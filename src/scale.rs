//! Fitting a source image into the on-screen viewport.

/// Largest on-screen box the preview may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub max_width: u32,
    pub max_height: u32,
}

impl Viewport {
    pub const fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Viewport covering `fraction` of a screen, truncated to whole pixels.
    /// `fraction` is clamped to `(0, 1]`; each side is at least one pixel.
    pub fn fraction_of(screen_width: u32, screen_height: u32, fraction: f64) -> Self {
        let fraction = if fraction.is_finite() && fraction > 0.0 {
            fraction.min(1.0)
        } else {
            1.0
        };
        Self {
            max_width: ((screen_width as f64 * fraction) as u32).max(1),
            max_height: ((screen_height as f64 * fraction) as u32).max(1),
        }
    }
}

/// Display scale for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleResult {
    /// `0 < scale <= 1.0`; exactly `1.0` only when the source already fits.
    pub scale: f64,
    pub display_width: u32,
    pub display_height: u32,
}

impl ScaleResult {
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0
    }
}

/// Computes the preview size for a `source_width` x `source_height` image.
///
/// Images that fit are shown as-is. Larger images are shrunk by
/// `min(max_width / source_width, max_height / source_height)` and the display
/// size is the rounded product, never below one pixel.
pub fn compute_scale(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
) -> ScaleResult {
    if source_width <= max_width && source_height <= max_height {
        return ScaleResult {
            scale: 1.0,
            display_width: source_width,
            display_height: source_height,
        };
    }

    let scale_x = max_width as f64 / source_width as f64;
    let scale_y = max_height as f64 / source_height as f64;
    let scale = scale_x.min(scale_y);
    let fit = |side: u32, max: u32| ((side as f64 * scale).round() as u32).clamp(1, max.max(1));
    let display_width = fit(source_width, max_width);
    let display_height = fit(source_height, max_height);

    ScaleResult {
        scale,
        display_width,
        display_height,
    }
}
