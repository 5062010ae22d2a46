//! PhotoFinish Core - Foundation types for race timing
//!
//! This crate provides the fundamental types used throughout PhotoFinish:
//! - Time representation (wall-clock anchors, frame rates, media time bases)
//! - Finish-line geometry and surface-origin conversion
//! - CPU frame images
//! - The shared error taxonomy

pub mod error;
pub mod frame;
pub mod geometry;
pub mod time;

pub use error::{PhotoFinishError, Result};
pub use frame::FrameImage;
pub use geometry::{FinishLinePlacement, LineEndpoints, PixelPoint, SurfaceOrigin};
pub use time::{format_race_time, round_to_millis, FrameRate, MediaTimeBase, Wallclock};
