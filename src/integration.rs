//! Integration module for connecting object detection backends with a
//! tracking session.
//!
//! This module provides traits and utilities for feeding detector output
//! (ONNX Runtime, Burn, or anything else producing boxes) into a
//! [`TrackingSession`](crate::TrackingSession).

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::TrackerPipeline;
