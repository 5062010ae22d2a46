//! Media file probing to get metadata without full decode.

use photofinish_core::{FrameRate, MediaTimeBase, PhotoFinishError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Information about a media file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Container duration in seconds
    pub duration_secs: f64,
    /// Container format
    pub format: String,
    /// Primary video stream, if any
    pub video: Option<VideoStreamInfo>,
}

/// Information about a video stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    /// Container time base; one tick is the finest timestamp granularity
    pub time_base: MediaTimeBase,
}

impl MediaProbe {
    /// Probe a media file with ffprobe.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PhotoFinishError::NotFound(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let output = Command::new(ffmpeg_sidecar::ffprobe::ffprobe_path())
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PhotoFinishError::Probe(format!(
                "ffprobe failed for {}: {}",
                path.display(),
                stderr.trim()
            )));
        }

        parse_probe_output(&path.to_string_lossy(), &output.stdout)
    }

    /// Check if the file has a video stream.
    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

/// Parse the JSON document ffprobe emits.
fn parse_probe_output(path: &str, stdout: &[u8]) -> Result<MediaProbe> {
    let root: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| PhotoFinishError::Probe(format!("Invalid ffprobe JSON: {e}")))?;

    let format = &root["format"];
    let duration_secs = format["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| PhotoFinishError::Probe("Missing container duration".into()))?;
    let format_name = format["format_name"].as_str().unwrap_or("unknown").to_string();

    let video = root["streams"]
        .as_array()
        .into_iter()
        .flatten()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .map(parse_video_stream)
        .transpose()?;

    Ok(MediaProbe {
        path: path.to_string(),
        duration_secs,
        format: format_name,
        video,
    })
}

fn parse_video_stream(stream: &serde_json::Value) -> Result<VideoStreamInfo> {
    let codec = stream["codec_name"].as_str().unwrap_or("unknown").to_string();
    let width = stream["width"]
        .as_u64()
        .ok_or_else(|| PhotoFinishError::Probe("Video stream missing width".into()))?
        as u32;
    let height = stream["height"]
        .as_u64()
        .ok_or_else(|| PhotoFinishError::Probe("Video stream missing height".into()))?
        as u32;

    // avg_frame_rate is the measured rate; r_frame_rate the nominal one.
    let frame_rate = stream["avg_frame_rate"]
        .as_str()
        .and_then(FrameRate::parse)
        .or_else(|| stream["r_frame_rate"].as_str().and_then(FrameRate::parse))
        .ok_or_else(|| PhotoFinishError::Probe("Video stream missing frame rate".into()))?;

    let time_base = stream["time_base"]
        .as_str()
        .and_then(MediaTimeBase::parse)
        .unwrap_or_default();

    Ok(VideoStreamInfo {
        codec,
        width,
        height,
        frame_rate,
        time_base,
    })
}
