//! Fire-and-forget handoff of outbound events to a worker pool.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{debug, warn};

use crate::error::{DispatchError, Error};
use crate::events::payload::OutboundEvent;
use crate::events::sink::EventSink;

/// Bounded queue drained by `workers` threads, each calling the sink.
///
/// [`dispatch`](Self::dispatch) never blocks. Dropping the dispatcher closes
/// the queue and detaches the workers; [`shutdown`](Self::shutdown) also
/// waits for them to drain what was already queued.
pub struct EventDispatcher {
    sender: Option<Sender<OutboundEvent>>,
    workers: Vec<JoinHandle<()>>,
}

impl EventDispatcher {
    pub fn spawn(sink: Arc<dyn EventSink>, workers: usize, queue_capacity: usize) -> Result<Self, Error> {
        let (sender, receiver) = crossbeam_channel::bounded(queue_capacity.max(1));

        let handles = (0..workers.max(1))
            .map(|n| {
                let sink = Arc::clone(&sink);
                let receiver = receiver.clone();
                thread::Builder::new()
                    .name(format!("queuetrack-events-{n}"))
                    .spawn(move || run_worker(sink, receiver))
                    .map_err(Error::Spawn)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            sender: Some(sender),
            workers: handles,
        })
    }

    /// Queue `event` for delivery without waiting.
    pub fn dispatch(&self, event: OutboundEvent) -> Result<(), DispatchError> {
        let sender = self.sender.as_ref().ok_or(DispatchError::Closed)?;
        sender.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Disconnected(_) => DispatchError::Closed,
        })
    }

    /// Events queued but not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.sender.as_ref().map_or(0, Sender::len)
    }

    /// Close the queue and wait for the workers to finish queued events.
    pub fn shutdown(mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("outbound worker panicked");
            }
        }
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.sender.take();
    }
}

fn run_worker(sink: Arc<dyn EventSink>, receiver: Receiver<OutboundEvent>) {
    for event in receiver.iter() {
        if let Err(e) = sink.deliver(&event) {
            match &event {
                OutboundEvent::Visit(visit) => warn!("dropping visit {}: {}", visit.id, e),
                OutboundEvent::Snapshot(_) => warn!("dropping stats snapshot: {}", e),
            }
        }
    }
    debug!("outbound worker stopped");
}
