//! Off-thread preview extraction for timeline scrubbing.
//!
//! Scrubbing fires many requests in quick succession and only the most
//! recent one matters. Each request gets a monotonically increasing id;
//! decodes run on background threads with a small in-flight cap, excess
//! requests coalesce into a single pending slot (latest wins), and the
//! consumer discards any completion older than what it already delivered
//! — completion order is not issue order.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use photofinish_core::{FrameImage, Result};
use photofinish_media::{extract, SeekMode, VideoAsset};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Maximum decodes running at once.
pub const MAX_IN_FLIGHT: usize = 2;

/// One completed (or failed) preview decode.
#[derive(Debug)]
pub struct ScrubFrame {
    /// Id returned by [`Scrubber::request`]
    pub request_id: u64,
    /// Video time that was requested
    pub video_time_secs: f64,
    /// The decoded frame, or the extraction error
    pub frame: Result<FrameImage>,
}

struct Inner {
    asset: VideoAsset,
    next_id: AtomicU64,
    in_flight: AtomicUsize,
    /// Coalesced newest request waiting for a free slot.
    pending: Mutex<Option<(u64, f64)>>,
    results_tx: Sender<ScrubFrame>,
}

impl Inner {
    fn try_reserve(&self) -> bool {
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < MAX_IN_FLIGHT).then_some(n + 1)
            })
            .is_ok()
    }

    fn release(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    fn submit(self: &Arc<Self>, request_id: u64, video_time_secs: f64) {
        if self.try_reserve() {
            self.spawn_decode(request_id, video_time_secs);
            return;
        }
        *self.pending.lock() = Some((request_id, video_time_secs));
        // A slot may have freed between the failed reservation and the
        // pending write; settle it so the request cannot strand.
        self.drain_pending();
    }

    fn drain_pending(self: &Arc<Self>) {
        while self.try_reserve() {
            match self.pending.lock().take() {
                Some((id, secs)) => self.spawn_decode(id, secs),
                None => {
                    self.release();
                    break;
                }
            }
        }
    }

    /// Runs with a slot already reserved.
    fn spawn_decode(self: &Arc<Self>, request_id: u64, video_time_secs: f64) {
        let inner = Arc::clone(self);
        std::thread::spawn(move || {
            trace!(request_id, video_time_secs, "scrub decode start");
            let frame = extract(&inner.asset, video_time_secs, SeekMode::Nearest);
            let _ = inner.results_tx.send(ScrubFrame {
                request_id,
                video_time_secs,
                frame,
            });
            inner.release();
            inner.drain_pending();
        });
    }
}

/// Preview frame scheduler over one recorded asset.
pub struct Scrubber {
    inner: Arc<Inner>,
    results_rx: Receiver<ScrubFrame>,
    last_delivered: AtomicU64,
}

impl Scrubber {
    /// Create a scrubber for a recorded asset.
    pub fn new(asset: VideoAsset) -> Self {
        let (results_tx, results_rx) = unbounded();
        Self {
            inner: Arc::new(Inner {
                asset,
                next_id: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                pending: Mutex::new(None),
                results_tx,
            }),
            results_rx,
            last_delivered: AtomicU64::new(0),
        }
    }

    /// Request a preview frame at a video time. Returns the request id;
    /// the result arrives later through [`Self::try_latest`].
    pub fn request(&self, video_time_secs: f64) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.submit(id, video_time_secs);
        id
    }

    /// Deliver the newest completed result, if any is newer than what
    /// was already delivered. Older completions are consumed and
    /// discarded.
    pub fn try_latest(&self) -> Option<ScrubFrame> {
        let mut newest: Option<ScrubFrame> = None;
        for result in self.results_rx.try_iter() {
            if newest
                .as_ref()
                .map_or(true, |n| result.request_id > n.request_id)
            {
                newest = Some(result);
            }
        }
        let newest = newest?;
        if newest.request_id <= self.last_delivered.load(Ordering::SeqCst) {
            return None;
        }
        self.last_delivered
            .store(newest.request_id, Ordering::SeqCst);
        Some(newest)
    }

    /// Whether no decode is running or queued.
    pub fn is_idle(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) == 0 && self.inner.pending.lock().is_none()
    }
}
