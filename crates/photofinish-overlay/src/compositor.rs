//! Finish-line compositing onto extracted frames.
//!
//! Endpoints are defined in a top-left-origin space during interactive
//! placement. The `image` buffer is also top-left origin, but every Y
//! coordinate still routes through [`SurfaceOrigin::to_buffer_point`] so
//! the origin conversion stays in one tested place instead of being
//! inlined into the drawing calls.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use photofinish_core::{
    geometry::DEFAULT_MARGIN_FRACTION, FinishLinePlacement, FrameImage, PhotoFinishError, Result,
    SurfaceOrigin,
};
use tracing::debug;

/// JPEG quality for exported stills.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Stroke parameters for the finish line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    /// Line and handle color, RGB
    pub color: [u8; 3],
    /// Handle radius in pixels — fixed, not scaled with resolution
    pub handle_radius_px: i32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: [255, 59, 48],
            handle_radius_px: 6,
        }
    }
}

/// Renders the finish-line guide onto an extracted frame and encodes the
/// result as a standalone JPEG, independent of the source codec.
///
/// Holds only configuration; every call takes immutable inputs and
/// returns a new value.
#[derive(Debug, Clone)]
pub struct OverlayCompositor {
    margin_fraction: f64,
    style: LineStyle,
}

impl OverlayCompositor {
    /// Origin convention of the `image` drawing surface. If the drawing
    /// backend ever changes to a bottom-up buffer, this is the only
    /// constant to update.
    const SURFACE_ORIGIN: SurfaceOrigin = SurfaceOrigin::TopLeft;

    /// Compositor with the default 10% vertical margin and style.
    pub fn new() -> Self {
        Self {
            margin_fraction: DEFAULT_MARGIN_FRACTION,
            style: LineStyle::default(),
        }
    }

    /// Override the vertical margin fraction.
    pub fn with_margin(mut self, margin_fraction: f64) -> Self {
        self.margin_fraction = margin_fraction;
        self
    }

    /// Override the stroke style.
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Burn the finish line into a frame, returning the composited image.
    ///
    /// Given identical placement and dimensions this draws the line at
    /// identical pixels every time:
    /// - top endpoint `(width * top_x, height * margin)`
    /// - bottom endpoint `(width * bottom_x, height * (1 - margin))`
    /// both in top-left-origin coordinates.
    pub fn composite(
        &self,
        frame: &FrameImage,
        placement: FinishLinePlacement,
    ) -> Result<RgbImage> {
        let mut canvas = RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
            .ok_or_else(|| {
                PhotoFinishError::Composite("could not allocate drawing surface".into())
            })?;

        let endpoints = placement.endpoints(frame.width, frame.height, self.margin_fraction);
        let top = Self::SURFACE_ORIGIN.to_buffer_point(endpoints.top, frame.height);
        let bottom = Self::SURFACE_ORIGIN.to_buffer_point(endpoints.bottom, frame.height);
        let color = Rgb(self.style.color);

        debug!(?top, ?bottom, "compositing finish line");

        draw_line_segment_mut(
            &mut canvas,
            (top.x as f32, top.y as f32),
            (bottom.x as f32, bottom.y as f32),
            color,
        );
        draw_filled_circle_mut(&mut canvas, (top.x, top.y), self.style.handle_radius_px, color);
        draw_filled_circle_mut(
            &mut canvas,
            (bottom.x, bottom.y),
            self.style.handle_radius_px,
            color,
        );

        Ok(canvas)
    }

    /// Encode a composited image as JPEG bytes.
    pub fn encode_jpeg(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode_image(image)
            .map_err(|e| PhotoFinishError::Encode(format!("JPEG encoding failed: {e}")))?;
        Ok(bytes)
    }

    /// Composite and encode in one step: the shape of an export.
    pub fn composite_to_jpeg(
        &self,
        frame: &FrameImage,
        placement: FinishLinePlacement,
    ) -> Result<Vec<u8>> {
        let image = self.composite(frame, placement)?;
        self.encode_jpeg(&image, DEFAULT_JPEG_QUALITY)
    }
}

impl Default for OverlayCompositor {
    fn default() -> Self {
        Self::new()
    }
}
