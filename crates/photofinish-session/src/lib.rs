//! PhotoFinish Session - Race session data model
//!
//! Implements the state a race-timing session carries:
//! - The session record (roster, wall-clock anchors, finish events)
//! - Timeline mapping between race time and video time
//! - Finishing-order derivation
//! - Versioned JSON persistence

pub mod event;
pub mod mapping;
pub mod ranking;
pub mod serialization;
pub mod session;

pub use event::{FinishEvent, LaneStatus, StatusMark};
pub use mapping::Timeline;
pub use ranking::{ranking, standings, LaneStanding, RankedLane};
pub use serialization::{SessionFile, SessionStore};
pub use session::{SessionRecord, DEFAULT_LANE_COUNT};
