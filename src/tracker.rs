mod clock;
mod crossing;
mod matching;
mod occupancy;
mod rect;
mod session;
mod track;
mod track_state;
mod track_store;

pub use clock::FrameTime;
pub use crossing::{Crossing, CrossingDirection, CrossingLines};
pub use matching::{
    AssignmentResult, Detection, DetectionFilter, centroid_distance, greedy_assignment,
};
pub use occupancy::Occupancy;
pub use rect::{BoundingBox, Point, distance};
pub use session::{FrameReport, TrackingSession};
pub use track::{DwellBand, PositionHistory, Track, TrackId, TrackView, Visit};
pub use track_state::LifecycleState;
pub use track_store::TrackStore;
