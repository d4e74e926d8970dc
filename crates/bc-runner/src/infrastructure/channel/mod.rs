//! Reporting channel: where asynchronous outcomes are delivered.
//!
//! The compiler and test adapters never raise their results as errors.  They
//! call [`ReportingChannel::log`] with an event name and a list of
//! human-readable strings, and the caller decides how to surface them.
//!
//! # Implementations
//!
//! - [`JsonLinesChannel`] writes one JSON object per line to any writer
//!   (stdout in the CLI), so an editor plugin or web UI can follow along.
//! - [`memory::MemoryChannel`] records events in memory for tests and for
//!   callers embedding the runner as a library.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use bc_core::{ChannelEvent, EventMessage};

pub mod memory;

/// Sink for compiler and test events.
pub trait ReportingChannel: Send + Sync {
    /// Emits `event` with its payload lines.
    fn log(&self, event: ChannelEvent, payload: Vec<String>);
}

/// Writes every event as a single line of JSON.
///
/// ```text
/// {"event":"compiling","payload":["Compiling..."]}
/// {"event":"compiler-success","payload":["Hash: 3f2a ..."]}
/// ```
pub struct JsonLinesChannel<W: Write + Send> {
    out: Mutex<W>,
    saw_error: AtomicBool,
}

impl JsonLinesChannel<std::io::Stdout> {
    /// A channel printing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesChannel<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            saw_error: AtomicBool::new(false),
        }
    }

    /// Returns `true` once any failure event has been emitted.
    pub fn saw_error(&self) -> bool {
        self.saw_error.load(Ordering::Relaxed)
    }

    /// Consumes the channel and returns the underlying writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ReportingChannel for JsonLinesChannel<W> {
    fn log(&self, event: ChannelEvent, payload: Vec<String>) {
        if event.is_error() {
            self.saw_error.store(true, Ordering::Relaxed);
        }
        debug!(event = event.as_str(), lines = payload.len(), "reporting channel event");

        let line = match serde_json::to_string(&EventMessage::new(event, payload)) {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to encode {event} event: {e}");
                return;
            }
        };
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!("failed to write {event} event: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
