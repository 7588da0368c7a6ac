//! JSON-over-HTTP sink for the persistence API.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::config::EventsConfig;
use crate::error::SinkError;
use crate::events::payload::{AggregateStats, VisitRecord};
use crate::events::sink::EventSink;

/// POSTs each payload as `application/json`. No retries.
#[derive(Debug, Clone)]
pub struct HttpSink {
    agent: ureq::Agent,
    visit_url: String,
    stats_url: String,
}

impl HttpSink {
    pub fn new(visit_url: impl Into<String>, stats_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            visit_url: visit_url.into(),
            stats_url: stats_url.into(),
        }
    }

    pub fn from_config(config: &EventsConfig) -> Self {
        Self::new(
            config.visit_url.clone(),
            config.stats_url.clone(),
            config.request_timeout(),
        )
    }

    fn post<T: Serialize>(&self, url: &str, payload: &T) -> Result<(), SinkError> {
        let body = serde_json::to_string(payload)?;
        let response = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => SinkError::Status {
                    url: url.to_string(),
                    code,
                },
                ureq::Error::Transport(t) => SinkError::Transport {
                    url: url.to_string(),
                    message: t.to_string(),
                },
            })?;

        let code = response.status();
        if !(200..300).contains(&code) {
            return Err(SinkError::Status {
                url: url.to_string(),
                code,
            });
        }
        debug!(url, code, "posted event");
        Ok(())
    }
}

impl EventSink for HttpSink {
    fn report_visit(&self, visit: &VisitRecord) -> Result<(), SinkError> {
        self.post(&self.visit_url, visit)
    }

    fn publish_snapshot(&self, stats: &AggregateStats) -> Result<(), SinkError> {
        self.post(&self.stats_url, stats)
    }
}
