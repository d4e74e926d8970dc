//! In-memory reporting channel.
//!
//! Records every event so tests can assert on what the adapters reported
//! without parsing JSON output.

use std::sync::Mutex;

use bc_core::{ChannelEvent, EventMessage};

use super::ReportingChannel;

/// A [`ReportingChannel`] that keeps every event in a `Vec`.
#[derive(Default)]
pub struct MemoryChannel {
    events: Mutex<Vec<EventMessage>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event recorded so far, oldest first.
    pub fn events(&self) -> Vec<EventMessage> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// The names of every recorded event, oldest first.
    pub fn names(&self) -> Vec<ChannelEvent> {
        self.events
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|e| e.event)
            .collect()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<EventMessage> {
        self.events.lock().expect("lock poisoned").last().cloned()
    }
}

impl ReportingChannel for MemoryChannel {
    fn log(&self, event: ChannelEvent, payload: Vec<String>) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(EventMessage::new(event, payload));
    }
}
