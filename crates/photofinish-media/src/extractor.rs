//! Single-frame extraction.
//!
//! Each request spawns its own short-lived FFmpeg decode, so extraction
//! is a pure read: it never touches the playback position of any open
//! player, and concurrent requests are independent. Nothing here
//! retries — a corrupt asset will not become valid on a second attempt.

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel, OutputVideoFrame};
use photofinish_core::{FrameImage, PhotoFinishError, Result};
use tracing::debug;

use crate::asset::VideoAsset;

/// How precisely the returned frame must match the requested time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekMode {
    /// Zero tolerance: returns the frame presented at the requested
    /// instant, and when the request equals a frame's presentation time
    /// the returned timestamp matches it to within one tick of the
    /// container time base. No nearest-frame substitution — required for
    /// finish images, where a one-frame error at 30-60 fps is a visible
    /// timing error.
    Exact,
    /// Nearest frame at or after a fast seek. Used for scrubbing, where
    /// latency matters more than exactness.
    Nearest,
}

/// Seconds of video decoded ahead of an exact target so the decoder
/// crosses the preceding keyframe gap and lands on the precise frame.
const EXACT_PREROLL_SECS: f64 = 0.5;

/// Retrieve one decoded frame from `asset` at video time `at_secs`.
///
/// Requests outside `[0, duration]` fail with `OutOfRange` and are never
/// clamped to the first or last frame.
pub fn extract(asset: &VideoAsset, at_secs: f64, mode: SeekMode) -> Result<FrameImage> {
    if !at_secs.is_finite() || at_secs < 0.0 || at_secs > asset.duration_secs() {
        return Err(PhotoFinishError::OutOfRange {
            requested_secs: at_secs,
            duration_secs: asset.duration_secs(),
        });
    }
    if !asset.path().exists() {
        return Err(PhotoFinishError::NotFound(format!(
            "Video file not accessible: {}",
            asset.path().display()
        )));
    }

    match mode {
        SeekMode::Exact => extract_exact(asset, at_secs),
        SeekMode::Nearest => extract_nearest(asset, at_secs),
    }
}

/// Fast path: input-seek straight to the target and take the first
/// decoded frame.
fn extract_nearest(asset: &VideoAsset, at_secs: f64) -> Result<FrameImage> {
    let frames = decode_window(asset, at_secs, 1)?;
    let frame = frames
        .into_iter()
        .next()
        .ok_or_else(|| PhotoFinishError::Decode("decoder produced no frame".into()))?;

    let pts = at_secs + frame.timestamp as f64;
    rgb_frame_to_image(frame, pts)
}

/// Exact path: resolve the request to the frame presented at that
/// instant, decode from shortly before it, and select the frame whose
/// timestamp matches — never a neighbor.
fn extract_exact(asset: &VideoAsset, at_secs: f64) -> Result<FrameImage> {
    let rate = asset.frame_rate();
    let tick_secs = asset.time_base().tick_secs();

    let index = presented_frame_index(rate, tick_secs, at_secs);
    let target_pts = rate.frame_time_secs(index);

    let seek_secs = (target_pts - EXACT_PREROLL_SECS).max(0.0);
    let window = target_pts - seek_secs + rate.frame_duration_secs();
    let max_frames = (window * rate.to_fps_f64()).ceil() as usize + 4;
    let half_frame = rate.frame_duration_secs() / 2.0;

    let frames = decode_window(asset, seek_secs, max_frames)?;
    for frame in frames {
        let pts = seek_secs + frame.timestamp as f64;
        if (pts - target_pts).abs() <= half_frame {
            debug!(target_pts, pts, "exact frame located");
            return rgb_frame_to_image(frame, target_pts);
        }
        if pts > target_pts + half_frame {
            break;
        }
    }

    Err(PhotoFinishError::Decode(format!(
        "frame at {:.6}s not produced by decoder",
        target_pts
    )))
}

/// Index of the frame presented at `at_secs`: the last frame whose
/// timestamp is at or before the request. One tick of slop absorbs
/// container timestamp rounding, so a request equal to a frame's
/// presentation time resolves to exactly that frame.
fn presented_frame_index(rate: photofinish_core::FrameRate, tick_secs: f64, at_secs: f64) -> i64 {
    ((at_secs + tick_secs) * rate.to_fps_f64()).floor() as i64
}

/// Decode up to `max_frames` raw RGB frames starting from an accurate
/// input seek at `seek_secs`. Frame timestamps are relative to the seek
/// point.
fn decode_window(
    asset: &VideoAsset,
    seek_secs: f64,
    max_frames: usize,
) -> Result<Vec<OutputVideoFrame>> {
    let seek_arg = format!("{seek_secs:.6}");
    let frames_arg = max_frames.to_string();
    let mut command = FfmpegCommand::new();
    command
        .args(["-ss", seek_arg.as_str()])
        .input(asset.path().to_string_lossy())
        .args(["-frames:v", frames_arg.as_str(), "-an"])
        .rawvideo();

    let mut child = command
        .spawn()
        .map_err(|e| PhotoFinishError::Decode(format!("failed to spawn ffmpeg: {e}")))?;

    let iter = child
        .iter()
        .map_err(|e| PhotoFinishError::Decode(format!("failed to read ffmpeg output: {e}")))?;

    let mut frames = Vec::new();
    let mut errors = Vec::new();
    for event in iter {
        match event {
            FfmpegEvent::OutputFrame(frame) => {
                frames.push(frame);
                if frames.len() >= max_frames {
                    break;
                }
            }
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) => {
                errors.push(message);
            }
            _ => {}
        }
    }
    let _ = child.kill();
    let _ = child.wait();

    if frames.is_empty() && !errors.is_empty() {
        return Err(PhotoFinishError::Decode(format!(
            "ffmpeg reported: {}",
            errors.join("; ")
        )));
    }

    Ok(frames)
}

/// Convert a raw sidecar frame into a [`FrameImage`], pinning the
/// presentation timestamp to `pts_secs`.
fn rgb_frame_to_image(frame: OutputVideoFrame, pts_secs: f64) -> Result<FrameImage> {
    if frame.pix_fmt != "rgb24" {
        return Err(PhotoFinishError::Decode(format!(
            "unexpected pixel format from decoder: {}",
            frame.pix_fmt
        )));
    }
    FrameImage::from_rgb24(frame.width, frame.height, frame.data, pts_secs).ok_or_else(|| {
        PhotoFinishError::Decode("decoded frame size does not match dimensions".into())
    })
}
