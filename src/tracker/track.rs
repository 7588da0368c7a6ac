//! Single tracked entity and its bounded position history.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tracker::clock::{FrameTime, wall_after};
use crate::tracker::rect::{BoundingBox, Point};
use crate::tracker::track_state::LifecycleState;

/// Number of centroids kept per track. Crossing detection reads two.
const HISTORY_LEN: usize = 2;

/// Live dwell below this is [`DwellBand::Short`].
const SHORT_DWELL_SECS: f64 = 20.0;
/// Live dwell below this is [`DwellBand::Medium`].
const MEDIUM_DWELL_SECS: f64 = 40.0;

/// Session-unique track identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-size ring of the most recent centroids, oldest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionHistory {
    slots: [Point; HISTORY_LEN],
    len: usize,
}

impl PositionHistory {
    pub fn new(first: Point) -> Self {
        let mut history = Self::default();
        history.push(first);
        history
    }

    pub fn push(&mut self, point: Point) {
        if self.len == HISTORY_LEN {
            self.slots.rotate_left(1);
            self.slots[HISTORY_LEN - 1] = point;
        } else {
            self.slots[self.len] = point;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `(previous, current)` once at least two positions were recorded.
    pub fn last_two(&self) -> Option<(Point, Point)> {
        (self.len == HISTORY_LEN).then(|| (self.slots[0], self.slots[1]))
    }
}

/// A completed pass through the monitored region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visit {
    pub entry: DateTime<Utc>,
    pub exit: DateTime<Utc>,
    pub dwell: Duration,
}

impl Visit {
    /// Freeze a visit. The exit wall time is derived from the monotonic
    /// dwell so it can never precede the entry.
    pub fn complete(entered_at: &FrameTime, now: &FrameTime) -> Self {
        let dwell = now.since(entered_at);
        Self {
            entry: entered_at.wall,
            exit: wall_after(entered_at.wall, dwell),
            dwell,
        }
    }

    pub fn dwell_seconds(&self) -> f64 {
        self.dwell.as_secs_f64()
    }
}

/// Coarse dwell classification used for queue displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DwellBand {
    Short,
    Medium,
    Long,
}

impl DwellBand {
    pub fn classify(dwell_seconds: f64) -> Self {
        if dwell_seconds < SHORT_DWELL_SECS {
            DwellBand::Short
        } else if dwell_seconds < MEDIUM_DWELL_SECS {
            DwellBand::Medium
        } else {
            DwellBand::Long
        }
    }
}

/// One physical entity currently or recently observed.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub bbox: BoundingBox,
    pub centroid: Point,
    pub history: PositionHistory,
    /// Consecutive frames without a matching detection
    pub lost_frames: u32,
    pub state: LifecycleState,
    pub first_seen: FrameTime,
    /// Set once on `Tracked -> Entered`
    pub entered_at: Option<FrameTime>,
    /// Set once on `Entered -> Exited`
    pub visit: Option<Visit>,
}

impl Track {
    pub(crate) fn new(id: TrackId, bbox: BoundingBox, now: FrameTime) -> Self {
        let centroid = bbox.center();
        Self {
            id,
            bbox,
            centroid,
            history: PositionHistory::new(centroid),
            lost_frames: 0,
            state: LifecycleState::Tracked,
            first_seen: now,
            entered_at: None,
            visit: None,
        }
    }

    /// Apply a matched detection.
    pub(crate) fn update(&mut self, bbox: BoundingBox) {
        self.bbox = bbox;
        self.centroid = bbox.center();
        self.history.push(self.centroid);
        self.lost_frames = 0;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.lost_frames = self.lost_frames.saturating_add(1);
    }

    pub(crate) fn mark_entered(&mut self, now: FrameTime) {
        debug_assert_eq!(self.state, LifecycleState::Tracked);
        self.state = LifecycleState::Entered;
        self.entered_at = Some(now);
    }

    /// Returns the frozen visit, or `None` if the track never entered.
    pub(crate) fn mark_exited(&mut self, now: FrameTime) -> Option<Visit> {
        let entered_at = self.entered_at.filter(|_| self.state == LifecycleState::Entered)?;
        let visit = Visit::complete(&entered_at, &now);
        self.state = LifecycleState::Exited;
        self.visit = Some(visit);
        Some(visit)
    }

    /// Dwell so far: frozen once exited, running while inside.
    pub fn live_dwell(&self, now: &FrameTime) -> Option<Duration> {
        match (self.visit, self.entered_at) {
            (Some(visit), _) => Some(visit.dwell),
            (None, Some(entered_at)) => Some(now.since(&entered_at)),
            (None, None) => None,
        }
    }

    pub fn view(&self, now: &FrameTime) -> TrackView {
        let live_dwell_seconds = self.live_dwell(now).map(|d| d.as_secs_f64());
        TrackView {
            id: self.id,
            bbox: self.bbox.to_tlbr(),
            state: self.state,
            lost_frames: self.lost_frames,
            live_dwell_seconds,
            dwell_band: live_dwell_seconds.map(DwellBand::classify),
        }
    }
}

/// Immutable per-track summary, safe to hand to other threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackView {
    pub id: TrackId,
    pub bbox: [f32; 4],
    pub state: LifecycleState,
    pub lost_frames: u32,
    pub live_dwell_seconds: Option<f64>,
    pub dwell_band: Option<DwellBand>,
}
