//! Recorded video asset handle.

use photofinish_core::{FrameRate, MediaTimeBase, PhotoFinishError, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::probe::MediaProbe;

/// A recorded race video: path plus the probed metadata the extractor
/// needs. Opening probes the container once; the handle itself is
/// immutable and cheap to clone.
#[derive(Debug, Clone)]
pub struct VideoAsset {
    path: PathBuf,
    duration_secs: f64,
    width: u32,
    height: u32,
    frame_rate: FrameRate,
    time_base: MediaTimeBase,
}

impl VideoAsset {
    /// Open and probe a recorded video file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let probe = MediaProbe::probe(&path)?;
        let video = probe.video.ok_or_else(|| {
            PhotoFinishError::Probe(format!("{} has no video stream", path.display()))
        })?;

        info!(
            path = %path.display(),
            duration = probe.duration_secs,
            rate = %video.frame_rate,
            "opened race video"
        );

        Ok(Self {
            path,
            duration_secs: probe.duration_secs,
            width: video.width,
            height: video.height,
            frame_rate: video.frame_rate,
            time_base: video.time_base,
        })
    }

    /// Build an asset from already-known metadata (tests, pre-probed files).
    pub fn from_parts(
        path: impl Into<PathBuf>,
        duration_secs: f64,
        width: u32,
        height: u32,
        frame_rate: FrameRate,
        time_base: MediaTimeBase,
    ) -> Self {
        Self {
            path: path.into(),
            duration_secs,
            width,
            height,
            frame_rate,
            time_base,
        }
    }

    /// File path of the recording.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Container duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Frame dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Video frame rate.
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Container time base.
    pub fn time_base(&self) -> MediaTimeBase {
        self.time_base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_accessors() {
        let asset = VideoAsset::from_parts(
            "/videos/heat1.mp4",
            42.7,
            1920,
            1080,
            FrameRate::FPS_60,
            MediaTimeBase::new(1, 15360),
        );
        assert_eq!(asset.path(), Path::new("/videos/heat1.mp4"));
        assert_eq!(asset.duration_secs(), 42.7);
        assert_eq!(asset.dimensions(), (1920, 1080));
        assert_eq!(asset.frame_rate(), FrameRate::FPS_60);
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let err = VideoAsset::open("/nonexistent/definitely-missing.mp4").unwrap_err();
        assert!(matches!(err, PhotoFinishError::NotFound(_)));
    }
}
