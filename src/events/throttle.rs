use std::time::{Duration, Instant};

/// Lets at most one publish through per `interval` of monotonic time.
/// Calls that arrive too early are refused, not deferred.
#[derive(Debug, Clone)]
pub struct PublishThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl PublishThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when a publish may happen at `now`; records it as the last one.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}
