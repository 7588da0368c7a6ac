//! Session configuration, loadable from TOML.
//!
//! Every section and field has a default, so a config file only needs the
//! values it changes:
//!
//! ```toml
//! [lines]
//! entry_x = 860.0
//! exit_x = 100.0
//!
//! [occupancy]
//! capacity_limit = 6
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::tracker::{CrossingLines, DetectionFilter};

/// Top-level configuration of a [`TrackingSession`](crate::TrackingSession).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub frame: FrameConfig,
    pub lines: CrossingLines,
    pub occupancy: OccupancyConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Detector class id to keep (0 is "person" for COCO models)
    pub target_class: u32,
    pub confidence_threshold: f32,
    /// Minimum box area in square pixels
    pub min_area: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            target_class: 0,
            confidence_threshold: 0.5,
            min_area: 400.0,
        }
    }
}

impl DetectionConfig {
    pub fn filter(&self) -> DetectionFilter {
        DetectionFilter {
            target_class: self.target_class,
            confidence_threshold: self.confidence_threshold,
            min_area: self.min_area,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Maximum centroid displacement (pixels) between frames for a match
    pub gating_distance: f32,
    /// A track is evicted once it has gone unmatched for more frames than this
    pub max_lost_frames: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            gating_distance: 80.0,
            max_lost_frames: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OccupancyConfig {
    pub capacity_limit: u64,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self { capacity_limit: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Minimum spacing between two aggregate snapshot publishes
    pub publish_interval_ms: u64,
    /// Endpoint receiving one POST per completed visit
    pub visit_url: String,
    /// Endpoint receiving the throttled aggregate snapshot
    pub stats_url: String,
    pub request_timeout_ms: u64,
    /// Background threads delivering outbound calls
    pub workers: usize,
    /// Events buffered for the workers before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            publish_interval_ms: 1000,
            visit_url: "http://127.0.0.1:8000/updateData/".to_string(),
            stats_url: "http://127.0.0.1:8000/updateStats/".to_string(),
            request_timeout_ms: 5000,
            workers: 2,
            queue_capacity: 256,
        }
    }
}

impl EventsConfig {
    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl SessionConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        let det = &self.detection;
        if !(0.0..=1.0).contains(&det.confidence_threshold) {
            return invalid(format!(
                "detection.confidence_threshold must be within [0, 1], got {}",
                det.confidence_threshold
            ));
        }
        if !(det.min_area >= 0.0) {
            return invalid(format!("detection.min_area must be >= 0, got {}", det.min_area));
        }
        if !(self.tracking.gating_distance > 0.0) {
            return invalid(format!(
                "tracking.gating_distance must be > 0, got {}",
                self.tracking.gating_distance
            ));
        }
        if self.frame.width == 0 || self.frame.height == 0 {
            return invalid(format!(
                "frame dimensions must be non-zero, got {}x{}",
                self.frame.width, self.frame.height
            ));
        }

        let width = self.frame.width as f32;
        for (name, x) in [("entry_x", self.lines.entry_x), ("exit_x", self.lines.exit_x)] {
            if !(0.0..=width).contains(&x) {
                return invalid(format!("lines.{name} = {x} lies outside the frame width {width}"));
            }
        }
        if !self.lines.is_ordered() {
            return invalid(format!(
                "lines.exit_x ({}) must lie past lines.entry_x ({}) in the {:?} direction",
                self.lines.exit_x, self.lines.entry_x, self.lines.direction
            ));
        }

        if self.occupancy.capacity_limit == 0 {
            return invalid("occupancy.capacity_limit must be at least 1".to_string());
        }

        let ev = &self.events;
        if ev.workers == 0 || ev.queue_capacity == 0 {
            return invalid("events.workers and events.queue_capacity must be at least 1".to_string());
        }
        if ev.visit_url.is_empty() || ev.stats_url.is_empty() {
            return invalid("events.visit_url and events.stats_url must be set".to_string());
        }
        Ok(())
    }
}
