//! Coordinate spaces and conversions
//!
//! Three coordinate systems are in play:
//! - mm-space: millimeters, origin at the top-left of the page
//! - pt-space: PDF points (1/72 inch), origin at the bottom-left of the page
//! - px-space: raster pixels at some render scale, origin at the top-left
//!
//! A render scale is "pixels per point", so a page rendered at scale `s`
//! is `width_pt * s` pixels wide.

use crate::constants::{MM_PER_POINT, POINTS_PER_MM};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Scalar Conversions
// =============================================================================

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters (unrounded)
#[inline]
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * MM_PER_POINT
}

/// Convert raster pixels at `scale` to millimeters
#[inline]
pub fn px_to_mm(px: f64, scale: f64) -> f64 {
    pt_to_mm(px / scale)
}

/// Convert millimeters to raster pixels at `scale`
#[inline]
pub fn mm_to_px(mm: f64, scale: f64) -> f64 {
    mm_to_pt(mm) * scale
}

/// Bottom edge of a top-left-origin mm rectangle, in bottom-left-origin points
#[inline]
pub fn flip_y_to_pdf_space(y_mm: f64, height_mm: f64, page_height_pt: f64) -> f64 {
    page_height_pt - (y_mm + height_mm) * POINTS_PER_MM
}

/// Inverse of [`flip_y_to_pdf_space`]: recover the mm top edge from the pt bottom edge
#[inline]
pub fn flip_y_from_pdf_space(y_pt: f64, height_mm: f64, page_height_pt: f64) -> f64 {
    pt_to_mm(page_height_pt - y_pt) - height_mm
}

/// Round to one decimal place for display and persistence
#[inline]
pub fn round_display(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// =============================================================================
// Millimeter Types
// =============================================================================

/// A point in mm-space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointMm {
    pub x: f64,
    pub y: f64,
}

impl PointMm {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn rounded(self) -> Self {
        Self::new(round_display(self.x), round_display(self.y))
    }
}

/// A rectangle in mm-space (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RectMm {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectMm {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized rectangle from two opposite corners
    pub fn from_corners(a: PointMm, b: PointMm) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn origin(&self) -> PointMm {
        PointMm::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Both dimensions strictly positive and finite
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn contains(&self, p: PointMm) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Same size, new top-left corner
    pub fn moved_to(&self, origin: PointMm) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    pub fn rounded(&self) -> Self {
        Self::new(
            round_display(self.x),
            round_display(self.y),
            round_display(self.width),
            round_display(self.height),
        )
    }

    /// Convert to pt-space on a page of the given height
    pub fn to_pt(&self, page_height_pt: f64) -> PtRect {
        PtRect {
            x: mm_to_pt(self.x),
            y: flip_y_to_pdf_space(self.y, self.height, page_height_pt),
            width: mm_to_pt(self.width),
            height: mm_to_pt(self.height),
        }
    }

    /// Convert to raster pixel bounds at `scale`, edges rounded to whole pixels
    pub fn to_pixels(&self, scale: f64) -> PixelRect {
        let left = mm_to_px(self.x, scale).round();
        let top = mm_to_px(self.y, scale).round();
        let right = mm_to_px(self.right(), scale).round();
        let bottom = mm_to_px(self.bottom(), scale).round();
        PixelRect {
            left: left as i64,
            top: top as i64,
            width: (right - left) as i64,
            height: (bottom - top) as i64,
        }
    }
}

// =============================================================================
// Point & Pixel Types
// =============================================================================

/// A rectangle in pt-space (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PtRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PtRect {
    /// Grow by `amount` on every side
    pub fn expand(&self, amount: f64) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + 2.0 * amount,
            height: self.height + 2.0 * amount,
        }
    }

    /// Shift by a page origin (MediaBox lower-left corner)
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A rectangle in raster pixels (top-left origin)
///
/// Signed so that out-of-page selections can be represented and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    /// Whether the rectangle is non-empty and lies entirely inside a raster
    pub fn fits_within(&self, raster_width: u32, raster_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.left >= 0
            && self.top >= 0
            && self
                .left
                .checked_add(self.width)
                .is_some_and(|right| right <= raster_width as i64)
            && self
                .top
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= raster_height as i64)
    }

    /// Pull the right and bottom edges back inside a raster
    pub fn clamp_to(&self, raster_width: u32, raster_height: u32) -> Self {
        let right = self.left.saturating_add(self.width).min(raster_width as i64);
        let bottom = self.top.saturating_add(self.height).min(raster_height as i64);
        Self {
            width: right.saturating_sub(self.left),
            height: bottom.saturating_sub(self.top),
            ..*self
        }
    }
}

// =============================================================================
// Render Info
// =============================================================================

/// Scale and native size of the page as currently rendered on screen
///
/// Recomputed every time the preview is re-rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInfo {
    pub scale: f64,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
}

impl RenderInfo {
    /// Scale that makes the page exactly `target_width_px` wide
    pub fn fit_width(target_width_px: f64, page_width_pt: f64, page_height_pt: f64) -> Self {
        let scale = if page_width_pt > 0.0 {
            target_width_px / page_width_pt
        } else {
            1.0
        };
        Self {
            scale,
            page_width_pt,
            page_height_pt,
        }
    }

    pub fn page_size_mm(&self) -> (f64, f64) {
        (pt_to_mm(self.page_width_pt), pt_to_mm(self.page_height_pt))
    }

    pub fn page_size_px(&self) -> (f64, f64) {
        (
            self.page_width_pt * self.scale,
            self.page_height_pt * self.scale,
        )
    }

    pub fn px_to_mm(&self, px: f64) -> f64 {
        px_to_mm(px, self.scale)
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm_to_px(mm, self.scale)
    }

    /// Screen position (relative to the page image) to mm-space
    pub fn point_to_mm(&self, x_px: f64, y_px: f64) -> PointMm {
        PointMm::new(self.px_to_mm(x_px), self.px_to_mm(y_px))
    }

    /// Clamp a point onto the page
    pub fn clamp_to_page(&self, p: PointMm) -> PointMm {
        let (w, h) = self.page_size_mm();
        PointMm::new(p.x.clamp(0.0, w), p.y.clamp(0.0, h))
    }
}
