//! Line-crossing people counter with occupancy control.
//!
//! Per-frame detections are matched to tracks by nearest centroid, tracks
//! walk through `Tracked -> Entered -> Exited` as they cross two vertical
//! lines, and completed visits plus periodic aggregate snapshots are handed
//! to background workers for delivery.
//!
//! ```no_run
//! use queuetrack_rs::{Detection, SessionConfig, TrackingSession};
//!
//! let mut session = TrackingSession::new(SessionConfig::default())?;
//! let report = session.process_frame(vec![Detection::new(880.0, 200.0, 930.0, 330.0, 0.9, 0)]);
//! println!("inside: {}", report.stats.inside);
//! session.shutdown();
//! # Ok::<(), queuetrack_rs::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod integration;
pub mod tracker;

pub use config::SessionConfig;
pub use error::{ConfigError, DispatchError, Error, SinkError};
pub use events::{AggregateStats, EventSink, HttpSink, VisitRecord};
pub use integration::{DetectionBuilder, DetectionSource, IntoDetections, TrackerPipeline};
pub use tracker::{
    BoundingBox, CrossingDirection, CrossingLines, Detection, FrameReport, FrameTime,
    LifecycleState, Occupancy, TrackId, TrackView, TrackingSession,
};
