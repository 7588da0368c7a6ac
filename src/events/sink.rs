//! Receiving end of outbound events.

use crate::error::SinkError;
use crate::events::payload::{AggregateStats, OutboundEvent, VisitRecord};

/// Downstream consumer of visits and snapshots.
///
/// Implementations are called from background worker threads, never from
/// the frame loop. Errors are logged by the caller and discarded.
///
/// # Example
///
/// ```ignore
/// use queuetrack_rs::{AggregateStats, EventSink, SinkError, VisitRecord};
///
/// struct Stdout;
///
/// impl EventSink for Stdout {
///     fn report_visit(&self, visit: &VisitRecord) -> Result<(), SinkError> {
///         println!("{}", serde_json::to_string(visit)?);
///         Ok(())
///     }
///
///     fn publish_snapshot(&self, stats: &AggregateStats) -> Result<(), SinkError> {
///         println!("{}", serde_json::to_string(stats)?);
///         Ok(())
///     }
/// }
/// ```
pub trait EventSink: Send + Sync {
    /// Deliver one completed visit.
    fn report_visit(&self, visit: &VisitRecord) -> Result<(), SinkError>;

    /// Deliver the latest aggregate snapshot.
    fn publish_snapshot(&self, stats: &AggregateStats) -> Result<(), SinkError>;

    /// Route an event to the matching method.
    fn deliver(&self, event: &OutboundEvent) -> Result<(), SinkError> {
        match event {
            OutboundEvent::Visit(visit) => self.report_visit(visit),
            OutboundEvent::Snapshot(stats) => self.publish_snapshot(stats),
        }
    }
}
