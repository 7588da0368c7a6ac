//! Outbound events: completed visits and throttled aggregate snapshots.
//!
//! The frame loop builds owned payloads and hands them to an
//! [`EventDispatcher`]; worker threads deliver them to an [`EventSink`]
//! such as [`HttpSink`]. Delivery is best effort.

mod dispatcher;
mod http;
mod payload;
mod sink;
mod throttle;

pub use dispatcher::EventDispatcher;
pub use http::HttpSink;
pub use payload::{AggregateStats, OutboundEvent, VisitRecord};
pub use sink::EventSink;
pub use throttle::PublishThrottle;
