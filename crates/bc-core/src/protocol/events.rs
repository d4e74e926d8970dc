//! Events emitted on the reporting channel.
//!
//! # JSON framing
//!
//! Every event travels as one JSON object with the event name and a list of
//! human-readable payload strings:
//!
//! ```json
//! {"event":"compiler-success","payload":["Hash: 3f2a\nTime: 812ms"]}
//! ```

use serde::{Deserialize, Serialize};

/// Every event name the runner emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelEvent {
    /// The bundler was started.
    Compiling,
    /// Formatting or bundling failed.
    CompilerError,
    /// The bundle was built with warnings.
    CompilerWarning,
    /// The bundle was built cleanly.
    CompilerSuccess,
    /// The runner itself is misconfigured (e.g. no bundler for the language).
    InternalError,
    /// A test command was started.
    Testing,
    /// The test command exited with a failure status.
    TestingError,
    /// The test command passed.
    TestingSuccess,
}

impl ChannelEvent {
    /// The wire name, e.g. `"compiler-error"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compiling => "compiling",
            Self::CompilerError => "compiler-error",
            Self::CompilerWarning => "compiler-warning",
            Self::CompilerSuccess => "compiler-success",
            Self::InternalError => "internal-error",
            Self::Testing => "testing",
            Self::TestingError => "testing-error",
            Self::TestingSuccess => "testing-success",
        }
    }

    /// Returns `true` for events that report a failure.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::CompilerError | Self::InternalError | Self::TestingError
        )
    }
}

impl std::fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One framed event: name plus payload lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMessage {
    pub event: ChannelEvent,
    pub payload: Vec<String>,
}

impl EventMessage {
    pub fn new(event: ChannelEvent, payload: Vec<String>) -> Self {
        Self { event, payload }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
