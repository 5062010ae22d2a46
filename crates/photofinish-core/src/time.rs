//! Time representation for frame-accurate race timing.
//!
//! Race time and video time are plain `f64` seconds; frame rates and
//! container time bases use rational numbers so frame/tick arithmetic
//! stays exact at fractional rates such as 30000/1001.

use chrono::{DateTime, Utc};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute wall-clock instant, timezone-aware.
///
/// All session anchors (race start, video start/stop) are wall-clock
/// timestamps from the OS; the design assumes no relative drift over the
/// duration of a single race.
pub type Wallclock = DateTime<Utc>;

/// Round a time in seconds to millisecond precision.
///
/// Finish times are frozen at millisecond precision when an event is
/// created, so serialized records and displayed times agree exactly.
#[inline]
pub fn round_to_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}

/// Format a race time as `M:SS.mmm` for display and export filenames.
pub fn format_race_time(seconds: f64) -> String {
    let seconds = round_to_millis(seconds.max(0.0));
    let whole = seconds as u64;
    let minutes = whole / 60;
    let secs = whole % 60;
    let millis = ((seconds - whole as f64) * 1000.0).round() as u64;
    format!("{minutes}:{secs:02}.{millis:03}")
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Parse an FFmpeg-style rate string such as `"30000/1001"` or `"25"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(2, '/');
        let numerator: u32 = parts.next()?.trim().parse().ok()?;
        let denominator: u32 = match parts.next() {
            Some(d) => d.trim().parse().ok()?,
            None => 1,
        };
        if numerator == 0 || denominator == 0 {
            return None;
        }
        Some(Self::new(numerator, denominator))
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Duration of a single frame in seconds.
    #[inline]
    pub fn frame_duration_secs(self) -> f64 {
        self.denominator as f64 / self.numerator as f64
    }

    /// Index of the frame whose presentation time is nearest to `seconds`.
    pub fn nearest_frame(self, seconds: f64) -> i64 {
        (seconds * self.to_fps_f64()).round() as i64
    }

    /// Presentation time of frame `index`, computed with rational
    /// arithmetic to avoid drift over long videos.
    pub fn frame_time_secs(self, index: i64) -> f64 {
        let t = Rational64::new(index * self.denominator as i64, self.numerator as i64);
        *t.numer() as f64 / *t.denom() as f64
    }

    /// Common frame rates
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Container time base: the duration of one sample tick in seconds,
/// expressed as a rational (e.g., 1/15360 for common MP4 video tracks).
///
/// The zero-tolerance extraction contract is stated in these ticks: the
/// decoded frame's presentation timestamp must equal the request to
/// within one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTimeBase {
    pub numerator: u32,
    pub denominator: u32,
}

impl MediaTimeBase {
    /// Create a new time base.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Parse an FFmpeg-style time base string such as `"1/15360"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.splitn(2, '/');
        let numerator: u32 = parts.next()?.trim().parse().ok()?;
        let denominator: u32 = parts.next()?.trim().parse().ok()?;
        if numerator == 0 || denominator == 0 {
            return None;
        }
        Some(Self::new(numerator, denominator))
    }

    /// One tick in seconds.
    #[inline]
    pub fn tick_secs(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for MediaTimeBase {
    fn default() -> Self {
        // 1 ms ticks; replaced by the probed container value when known.
        Self::new(1, 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_to_millis() {
        assert_eq!(round_to_millis(12.34549), 12.345);
        assert_eq!(round_to_millis(12.3455), 12.346);
        assert_eq!(round_to_millis(0.0), 0.0);
    }

    #[test]
    fn test_format_race_time() {
        assert_eq!(format_race_time(0.0), "0:00.000");
        assert_eq!(format_race_time(12.345), "0:12.345");
        assert_eq!(format_race_time(83.5), "1:23.500");
        assert_eq!(format_race_time(-1.0), "0:00.000");
    }

    #[test]
    fn test_frame_rate_parse() {
        assert_eq!(FrameRate::parse("30000/1001"), Some(FrameRate::FPS_29_97));
        assert_eq!(FrameRate::parse("25"), Some(FrameRate::FPS_25));
        assert_eq!(FrameRate::parse("0/1"), None);
        assert_eq!(FrameRate::parse("garbage"), None);
    }

    #[test]
    fn test_nearest_frame_roundtrip_29_97() {
        let rate = FrameRate::FPS_29_97;
        for index in [0i64, 1, 29, 30, 1798, 1799] {
            let t = rate.frame_time_secs(index);
            assert_eq!(rate.nearest_frame(t), index);
        }
    }

    #[test]
    fn test_time_base_parse() {
        let tb = MediaTimeBase::parse("1/15360").unwrap();
        assert!((tb.tick_secs() - 1.0 / 15360.0).abs() < 1e-12);
        assert_eq!(MediaTimeBase::parse("1"), None);
    }

    proptest! {
        #[test]
        fn round_to_millis_is_idempotent(secs in 0.0f64..100_000.0) {
            let once = round_to_millis(secs);
            prop_assert_eq!(once, round_to_millis(once));
        }

        #[test]
        fn nearest_frame_inverts_frame_time(index in 0i64..500_000) {
            let rate = FrameRate::FPS_59_94;
            prop_assert_eq!(rate.nearest_frame(rate.frame_time_secs(index)), index);
        }
    }
}
