//! TrackerPipeline for combining detection with a tracking session.

use crate::config::SessionConfig;
use crate::error::Error;
use crate::tracker::{FrameReport, TrackingSession};

use super::DetectionSource;

/// A detector bundled with the tracking session it feeds.
///
/// Detector failures are the only errors a frame can return; everything
/// downstream of detection is contained inside the session.
pub struct TrackerPipeline<D: DetectionSource> {
    detector: D,
    session: TrackingSession,
}

impl<D: DetectionSource> TrackerPipeline<D> {
    /// Create a pipeline whose session posts to the configured endpoints.
    pub fn new(detector: D, config: SessionConfig) -> Result<Self, Error> {
        Ok(Self::from_session(detector, TrackingSession::new(config)?))
    }

    /// Wrap an already constructed session.
    pub fn from_session(detector: D, session: TrackingSession) -> Self {
        Self { detector, session }
    }

    /// Run detection on one image and advance the session.
    pub fn process_frame(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<FrameReport, D::Error> {
        let detections = self.detector.detect(input, width, height)?;
        Ok(self.session.process_frame(detections))
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying session.
    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    /// Get a mutable reference to the underlying session.
    pub fn session_mut(&mut self) -> &mut TrackingSession {
        &mut self.session
    }

    /// Stop the session, returning the detector.
    pub fn shutdown(self) -> D {
        self.session.shutdown();
        self.detector
    }
}
