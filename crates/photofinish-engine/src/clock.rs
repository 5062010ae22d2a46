//! Periodic elapsed-time tick.
//!
//! The race clock display refreshes on a fine-grained tick. The tick
//! only drives a derived display value — it never mutates finish events
//! or the timeline offset — so it lives here as a plain scheduler,
//! fully decoupled from the mapping logic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle for cancelling a running ticker.
#[derive(Debug, Clone)]
pub struct TickCancel(Arc<AtomicBool>);

impl TickCancel {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A periodic callback on a dedicated thread.
pub struct ElapsedTicker {
    cancel: TickCancel,
    thread: Option<JoinHandle<()>>,
}

impl ElapsedTicker {
    /// Display refresh granularity.
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(10);

    /// Start ticking. `on_tick` runs once per period until the ticker is
    /// stopped or dropped.
    pub fn start(period: Duration, on_tick: impl Fn() + Send + 'static) -> Self {
        let cancel = TickCancel::new();
        let thread_cancel = cancel.clone();
        let thread = std::thread::spawn(move || {
            while !thread_cancel.is_cancelled() {
                std::thread::sleep(period);
                if thread_cancel.is_cancelled() {
                    break;
                }
                on_tick();
            }
        });
        Self {
            cancel,
            thread: Some(thread),
        }
    }

    /// Start with the default 10 ms period.
    pub fn start_default(on_tick: impl Fn() + Send + 'static) -> Self {
        Self::start(Self::DEFAULT_PERIOD, on_tick)
    }

    /// A cancellation handle usable from other threads.
    pub fn cancel_handle(&self) -> TickCancel {
        self.cancel.clone()
    }

    /// Stop ticking and wait for the thread to exit.
    pub fn stop(mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ElapsedTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_ticks_then_stops() {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);
        let ticker = ElapsedTicker::start(Duration::from_millis(1), move || {
            tick_count.fetch_add(1, Ordering::SeqCst);
        });

        std::thread::sleep(Duration::from_millis(50));
        ticker.stop();
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop > 0);

        // No ticks after stop.
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[test]
    fn test_cancel_handle_stops_ticker() {
        let count = Arc::new(AtomicUsize::new(0));
        let tick_count = Arc::clone(&count);
        let ticker = ElapsedTicker::start(Duration::from_millis(1), move || {
            tick_count.fetch_add(1, Ordering::SeqCst);
        });

        ticker.cancel_handle().cancel();
        std::thread::sleep(Duration::from_millis(10));
        let snapshot = count.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(count.load(Ordering::SeqCst), snapshot);
        ticker.stop();
    }
}
