//! Finish-line geometry.
//!
//! The finish line is stored as two normalized horizontal positions so the
//! same placement maps onto the live preview and the exported still at any
//! resolution. All pixel positions here use a top-left origin (row 0 =
//! visual top), matching how the operator placed the line interactively;
//! conversion to a drawing surface with a different origin goes through
//! [`SurfaceOrigin::to_buffer_y`] and nowhere else.

use serde::{Deserialize, Serialize};

/// Default vertical margin: the line endpoints sit 10% of the frame
/// height in from the top and bottom edges.
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.10;

/// An integer pixel position, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Normalized finish-line placement: horizontal positions of the two
/// draggable endpoints, each in `[0, 1]` relative to frame width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishLinePlacement {
    /// Horizontal position of the top endpoint.
    pub top_x: f64,
    /// Horizontal position of the bottom endpoint.
    pub bottom_x: f64,
}

impl FinishLinePlacement {
    /// Create a placement, clamping both endpoints into `[0, 1]`.
    pub fn new(top_x: f64, bottom_x: f64) -> Self {
        Self {
            top_x: top_x.clamp(0.0, 1.0),
            bottom_x: bottom_x.clamp(0.0, 1.0),
        }
    }

    /// Resolve the placement to pixel endpoints for a frame of the given
    /// dimensions, with endpoints inset vertically by `margin_fraction`
    /// of the frame height.
    ///
    /// Contract (top-left origin):
    /// - top endpoint: `(width * top_x, height * margin_fraction)`
    /// - bottom endpoint: `(width * bottom_x, height * (1 - margin_fraction))`
    pub fn endpoints(self, width: u32, height: u32, margin_fraction: f64) -> LineEndpoints {
        let w = width as f64;
        let h = height as f64;
        LineEndpoints {
            top: PixelPoint::new(
                (w * self.top_x).round() as i32,
                (h * margin_fraction).round() as i32,
            ),
            bottom: PixelPoint::new(
                (w * self.bottom_x).round() as i32,
                (h * (1.0 - margin_fraction)).round() as i32,
            ),
        }
    }
}

impl Default for FinishLinePlacement {
    fn default() -> Self {
        // Vertical line through the frame center.
        Self {
            top_x: 0.5,
            bottom_x: 0.5,
        }
    }
}

/// The two resolved endpoints of a finish line, in top-left-origin pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEndpoints {
    pub top: PixelPoint,
    pub bottom: PixelPoint,
}

/// Vertical origin convention of a drawing surface.
///
/// Interactive placement happens in a top-left-origin space. Some image
/// buffers put row 0 at the visual bottom; every Y coordinate handed to a
/// drawing primitive must pass through [`Self::to_buffer_y`] so the
/// conversion lives in exactly one tested place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceOrigin {
    /// Row 0 is the visual top (the UI convention).
    TopLeft,
    /// Row 0 is the visual bottom; rows count upward.
    BottomLeft,
}

impl SurfaceOrigin {
    /// Convert a top-left-origin row to this surface's row index for a
    /// buffer of `height` rows.
    #[inline]
    pub fn to_buffer_y(self, ui_y: i32, height: u32) -> i32 {
        match self {
            Self::TopLeft => ui_y,
            Self::BottomLeft => height as i32 - 1 - ui_y,
        }
    }

    /// Map a full point from UI space into this surface's space.
    #[inline]
    pub fn to_buffer_point(self, point: PixelPoint, height: u32) -> PixelPoint {
        PixelPoint::new(point.x, self.to_buffer_y(point.y, height))
    }
}
