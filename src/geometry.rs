//! Value types for display-space selections and source-space crop boxes.

/// A pointer position in display space.
///
/// Signed because a drag can leave the preview while the button is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Selection rectangle in display coordinates.
///
/// Values produced by [`SelectionRect::from_corners`] are always normalized
/// (`x1 <= x2`, `y1 <= y2`) and clipped to the display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl SelectionRect {
    /// Builds a rectangle from two arbitrary corners: sorts them, then clips
    /// each coordinate to `[0, display_width] x [0, display_height]`.
    pub fn from_corners(a: Point, b: Point, display_width: u32, display_height: u32) -> Self {
        let (x1, x2) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
        let (y1, y2) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
        let max_x = to_i32(display_width);
        let max_y = to_i32(display_height);

        Self {
            x1: x1.clamp(0, max_x),
            y1: y1.clamp(0, max_y),
            x2: x2.clamp(0, max_x),
            y2: y2.clamp(0, max_y),
        }
    }

    /// Re-normalizes an existing rectangle. Idempotent.
    pub fn normalized(self, display_width: u32, display_height: u32) -> Self {
        Self::from_corners(
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y2),
            display_width,
            display_height,
        )
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Closed-interval hit test. A degenerate rectangle contains nothing.
    pub fn contains(&self, p: Point) -> bool {
        !self.is_degenerate()
            && self.x1 <= p.x
            && p.x <= self.x2
            && self.y1 <= p.y
            && p.y <= self.y2
    }

    /// Moves the top-left corner to `origin` (clamped so the whole rectangle
    /// stays inside the display), keeping width and height.
    pub fn moved_to(self, origin: Point, display_width: u32, display_height: u32) -> Self {
        let w = self.width();
        let h = self.height();
        let x1 = origin.x.clamp(0, (to_i32(display_width) - w).max(0));
        let y1 = origin.y.clamp(0, (to_i32(display_height) - h).max(0));

        Self {
            x1,
            y1,
            x2: x1 + w,
            y2: y1 + h,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }
}

/// Crop rectangle in source-image pixels, half-open: `x2` and `y2` are
/// exclusive, so `width() == x2 - x1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}
