//! PhotoFinish Overlay - burn the finish-line guide into exported stills
//!
//! The exported image must show the line exactly where the operator saw
//! it in the live overlay: same normalized endpoints, same margin, same
//! handle geometry, measured relative to frame dimensions.

pub mod compositor;

pub use compositor::{LineStyle, OverlayCompositor, DEFAULT_JPEG_QUALITY};
