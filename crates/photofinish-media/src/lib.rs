//! PhotoFinish Media - FFmpeg integration for video I/O
//!
//! This crate handles:
//! - Media file probing (duration, dimensions, frame rate, time base)
//! - Single-frame extraction, with an exact zero-tolerance mode for
//!   finish images and a fast nearest-frame mode for scrubbing
//!
//! FFmpeg runs as a sidecar process per request; extraction is a pure
//! read that shares no state with any player instance.

pub mod asset;
pub mod extractor;
pub mod probe;

pub use asset::VideoAsset;
pub use extractor::{extract, SeekMode};
pub use probe::{MediaProbe, VideoStreamInfo};

use photofinish_core::{PhotoFinishError, Result};

/// Initialize FFmpeg (call once at startup).
///
/// Downloads a static ffmpeg/ffprobe build when none is installed, so
/// extraction works without system packages.
pub fn init() -> Result<()> {
    ffmpeg_sidecar::download::auto_download()
        .map_err(|e| PhotoFinishError::Internal(format!("FFmpeg unavailable: {e}")))?;
    tracing::info!("PhotoFinish media initialized");
    Ok(())
}
