//! Finish-image export.
//!
//! An export re-decodes the exact frame for the event, burns in the
//! finish line, encodes a standalone JPEG, and writes it to disk. The
//! whole pipeline runs off the UI thread; exports against the same
//! output path are serialized by a per-path lock, and failures leave the
//! session record untouched — the caller records the path only after a
//! success comes back.

use parking_lot::Mutex;
use photofinish_core::{format_race_time, FinishLinePlacement, PhotoFinishError, Result};
use photofinish_media::{extract, SeekMode, VideoAsset};
use photofinish_overlay::OverlayCompositor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the output path for a finish image:
/// `<dir>/<race name>-<race time>.jpg`, e.g. `Final A-1m23.456.jpg`.
pub fn finish_image_path(dir: &Path, race_name: &str, race_time_secs: f64) -> PathBuf {
    let time = format_race_time(race_time_secs).replace(':', "m");
    let name: String = race_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("{}-{}.jpg", name.trim(), time))
}

/// Default export directory: the user's pictures folder, falling back to
/// the temp dir when the platform has none.
pub fn default_output_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(std::env::temp_dir)
}

/// One export request, fully snapshotted: nothing here aliases live
/// session state.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// The recorded asset to decode from
    pub asset: VideoAsset,
    /// Video time of the finish frame
    pub video_time_secs: f64,
    /// Finish-line placement to burn in
    pub placement: FinishLinePlacement,
    /// Destination file
    pub output_path: PathBuf,
}

/// Runs export jobs off the UI thread, serialized per output path.
pub struct Exporter {
    compositor: OverlayCompositor,
    path_locks: Arc<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Exporter {
    /// Exporter with the default compositor configuration.
    pub fn new() -> Self {
        Self {
            compositor: OverlayCompositor::new(),
            path_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Exporter with a custom compositor (margin/style overrides).
    pub fn with_compositor(compositor: OverlayCompositor) -> Self {
        Self {
            compositor,
            path_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_for(&self, path: &Path) -> Arc<tokio::sync::Mutex<()>> {
        self.path_locks
            .lock()
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Run one export to completion and report the written path.
    ///
    /// Two exports against the same path never run concurrently; a
    /// second one waits for the first to finish. Errors are terminal for
    /// this attempt — no retries.
    pub async fn export(&self, job: ExportJob) -> Result<PathBuf> {
        let lock = self.lock_for(&job.output_path);
        let _guard = lock.lock().await;

        let compositor = self.compositor.clone();
        let output_path = job.output_path.clone();
        let outcome = tokio::task::spawn_blocking(move || run_export(&job, &compositor))
            .await
            .map_err(|e| PhotoFinishError::Internal(format!("export task failed: {e}")))?;

        match &outcome {
            Ok(path) => info!(path = %path.display(), "finish image exported"),
            Err(e) => warn!(path = %output_path.display(), error = %e, "export failed"),
        }
        outcome
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// The blocking pipeline: extract-exact, composite, encode, write.
fn run_export(job: &ExportJob, compositor: &OverlayCompositor) -> Result<PathBuf> {
    let frame = extract(&job.asset, job.video_time_secs, SeekMode::Exact)?;
    let bytes = compositor.composite_to_jpeg(&frame, job.placement)?;

    if let Some(parent) = job.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&job.output_path, bytes)?;
    Ok(job.output_path.clone())
}
