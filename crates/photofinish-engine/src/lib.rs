//! PhotoFinish Engine - the controller layer
//!
//! Owns the session record on behalf of a UI thread and wires the other
//! crates together:
//! - [`SessionController`]: synchronous mutation API plus a notification
//!   channel for observers
//! - [`Scrubber`]: off-thread preview extraction with stale-result
//!   discard and a bounded in-flight count
//! - [`Exporter`]: extract-exact → composite → encode → write, serialized
//!   per output path
//! - [`ElapsedTicker`]: the periodic race-clock display tick

pub mod clock;
pub mod controller;
pub mod export;
pub mod scrub;

pub use clock::{ElapsedTicker, TickCancel};
pub use controller::{Overwrite, SessionController, SessionEvent};
pub use export::{default_output_dir, finish_image_path, ExportJob, Exporter};
pub use scrub::{ScrubFrame, Scrubber};
