//! Per-frame time sampling.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// A frame's timestamp, sampled once when the frame is processed.
///
/// The monotonic half drives dwell times and publish throttling; the wall
/// half only labels outbound payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    pub monotonic: Instant,
    pub wall: DateTime<Utc>,
}

impl FrameTime {
    pub fn now() -> Self {
        Self {
            monotonic: Instant::now(),
            wall: Utc::now(),
        }
    }

    /// The same clock advanced by `elapsed` on both halves.
    pub fn advanced_by(&self, elapsed: Duration) -> Self {
        Self {
            monotonic: self.monotonic + elapsed,
            wall: wall_after(self.wall, elapsed),
        }
    }

    /// Monotonic time elapsed since `earlier`, zero if `earlier` is later.
    pub fn since(&self, earlier: &FrameTime) -> Duration {
        self.monotonic.saturating_duration_since(earlier.monotonic)
    }
}

/// `start + elapsed`, saturating at the end of chrono's range.
pub(crate) fn wall_after(start: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(elapsed)
        .ok()
        .and_then(|d| start.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
