//! Tracking session: per-frame assignment, crossing and occupancy.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::Error;
use crate::events::{
    AggregateStats, EventDispatcher, EventSink, HttpSink, OutboundEvent, PublishThrottle,
    VisitRecord,
};
use crate::tracker::clock::FrameTime;
use crate::tracker::crossing::{Crossing, CrossingLines};
use crate::tracker::matching::{self, AssignmentResult, Detection, DetectionFilter};
use crate::tracker::occupancy::Occupancy;
use crate::tracker::rect::{BoundingBox, Point};
use crate::tracker::track::{TrackId, TrackView};
use crate::tracker::track_store::TrackStore;

/// Everything that happened while processing one frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame_id: u64,
    /// Detections dropped by class, confidence or area
    pub rejected_detections: usize,
    /// The frame started at or above capacity; no tracks could be created
    pub capacity_gated: bool,
    pub matched: Vec<TrackId>,
    pub created: Vec<TrackId>,
    /// Unmatched detections that did not become tracks because of capacity
    pub not_admitted: usize,
    pub entered: Vec<TrackId>,
    pub visits: Vec<VisitRecord>,
    pub evicted: Vec<TrackId>,
    /// Evicted while inside: entry counted, exit never observed
    pub abnormal_losses: Vec<TrackId>,
    pub stats: AggregateStats,
    pub snapshot_published: bool,
}

/// One camera's tracker, counters and outbound channel.
pub struct TrackingSession {
    store: TrackStore,
    occupancy: Occupancy,
    filter: DetectionFilter,
    lines: CrossingLines,
    gating_distance: f32,
    max_lost_frames: u32,
    total_dwell: Duration,
    throttle: PublishThrottle,
    dispatcher: EventDispatcher,
    frame_id: u64,
}

impl TrackingSession {
    /// Create a session that posts events to the configured HTTP endpoints.
    pub fn new(config: SessionConfig) -> Result<Self, Error> {
        let sink = Arc::new(HttpSink::from_config(&config.events));
        Self::with_sink(config, sink)
    }

    /// Create a session delivering events to `sink`.
    pub fn with_sink(config: SessionConfig, sink: Arc<dyn EventSink>) -> Result<Self, Error> {
        config.validate()?;
        let dispatcher =
            EventDispatcher::spawn(sink, config.events.workers, config.events.queue_capacity)?;

        info!(
            capacity = config.occupancy.capacity_limit,
            entry_x = config.lines.entry_x,
            exit_x = config.lines.exit_x,
            "tracking session started"
        );

        Ok(Self {
            store: TrackStore::new(),
            occupancy: Occupancy::new(config.occupancy.capacity_limit),
            filter: config.detection.filter(),
            lines: config.lines,
            gating_distance: config.tracking.gating_distance,
            max_lost_frames: config.tracking.max_lost_frames,
            total_dwell: Duration::ZERO,
            throttle: PublishThrottle::new(config.events.publish_interval()),
            dispatcher,
            frame_id: 0,
        })
    }

    /// Process one frame of raw detections, sampling the clock now.
    pub fn process_frame(&mut self, detections: Vec<Detection>) -> FrameReport {
        self.process_frame_at(detections, FrameTime::now())
    }

    /// Process one frame of raw detections observed at `now`.
    pub fn process_frame_at(&mut self, detections: Vec<Detection>, now: FrameTime) -> FrameReport {
        self.frame_id += 1;

        let (boxes, rejected_detections) = self.filter.apply(detections);
        let capacity_gated = self.occupancy.is_over_capacity();

        // Step 1: Associate detections with live tracks
        let (ids, track_points): (Vec<TrackId>, Vec<Point>) =
            self.store.iter().map(|t| (t.id, t.centroid)).unzip();
        let det_points: Vec<Point> = boxes.iter().map(BoundingBox::center).collect();
        let dists = matching::centroid_distance(&track_points, &det_points);

        let AssignmentResult {
            matches,
            unmatched_tracks,
            unmatched_detections,
        } = matching::greedy_assignment(&dists, self.gating_distance);

        let mut matched = Vec::with_capacity(matches.len());
        for (itracked, idet) in matches {
            let id = ids[itracked];
            if let Some(track) = self.store.get_mut(id) {
                track.update(boxes[idet]);
                matched.push(id);
            }
        }

        // Step 2: Admit new tracks while there is room
        let capacity = self.occupancy.capacity_limit();
        let mut created = Vec::new();
        let mut not_admitted = 0;
        for idet in unmatched_detections {
            if !capacity_gated && (self.store.len() as u64) < capacity {
                let id = self.store.spawn(boxes[idet], now);
                debug!(track = %id, x = det_points[idet].x, "new track");
                created.push(id);
            } else {
                not_admitted += 1;
            }
        }

        // Step 3: Age and evict unmatched tracks
        let mut evicted = Vec::new();
        let mut abnormal_losses = Vec::new();
        for itracked in unmatched_tracks {
            let id = ids[itracked];
            let Some(track) = self.store.get_mut(id) else {
                continue;
            };
            track.mark_missed();
            if track.lost_frames <= self.max_lost_frames {
                continue;
            }

            if let Some(track) = self.store.remove(id) {
                if track.state.is_inside() {
                    warn!(
                        track = %id,
                        lost_frames = track.lost_frames,
                        "track lost while inside; dwell time unknown"
                    );
                    abnormal_losses.push(id);
                } else {
                    debug!(track = %id, state = ?track.state, "track evicted");
                }
                evicted.push(id);
            }
        }

        // Step 4: Line crossings for tracks that moved this frame
        let mut entered = Vec::new();
        let mut visits = Vec::new();
        for &id in &matched {
            let Some(track) = self.store.get_mut(id) else {
                continue;
            };
            let Some((prev, cur)) = track.history.last_two() else {
                continue;
            };

            match self.lines.evaluate(track.state, prev, cur) {
                Some(Crossing::Entry) => {
                    track.mark_entered(now);
                    self.occupancy.record_entry();
                    info!(track = %id, inside = self.occupancy.inside(), "entered");
                    entered.push(id);
                }
                Some(Crossing::Exit) => {
                    let alert = self.occupancy.is_over_capacity();
                    if let Some(visit) = track.mark_exited(now) {
                        self.occupancy.record_exit();
                        self.total_dwell += visit.dwell;
                        info!(
                            track = %id,
                            dwell_secs = visit.dwell_seconds(),
                            inside = self.occupancy.inside(),
                            "exited"
                        );
                        visits.push(VisitRecord::new(id, &visit, alert));
                    }
                }
                None => {}
            }
        }

        for visit in &visits {
            self.emit(OutboundEvent::Visit(visit.clone()));
        }

        // Step 5: Aggregate snapshot, throttled
        let stats = self.stats(&now);
        let snapshot_published = self.throttle.ready(now.monotonic);
        if snapshot_published {
            self.emit(OutboundEvent::Snapshot(stats.clone()));
        }

        debug!(
            frame = self.frame_id,
            tracks = self.store.len(),
            matched = matched.len(),
            created = created.len(),
            inside = stats.inside,
            "frame processed"
        );

        FrameReport {
            frame_id: self.frame_id,
            rejected_detections,
            capacity_gated,
            matched,
            created,
            not_admitted,
            entered,
            visits,
            evicted,
            abnormal_losses,
            stats,
            snapshot_published,
        }
    }

    fn emit(&self, event: OutboundEvent) {
        if let Err(e) = self.dispatcher.dispatch(event) {
            warn!(pending = self.dispatcher.pending(), "outbound event dropped: {}", e);
        }
    }

    /// Aggregate counters as of `now`.
    pub fn stats(&self, now: &FrameTime) -> AggregateStats {
        AggregateStats::collect(
            &self.occupancy,
            self.total_dwell.as_secs_f64(),
            self.store.len(),
            now.wall,
        )
    }

    /// Summaries of every live track, ascending by id.
    pub fn tracks(&self, now: &FrameTime) -> Vec<TrackView> {
        self.store.iter().map(|t| t.view(now)).collect()
    }

    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    /// Stop the session and let queued events finish delivering.
    pub fn shutdown(self) {
        info!(
            frames = self.frame_id,
            entered = self.occupancy.entered(),
            exited = self.occupancy.exited(),
            "tracking session stopped"
        );
        self.dispatcher.shutdown();
    }
}
