//! Activity tracking for failed builds.
//!
//! When a student's code does not compile, the runner records an
//! `exercise_error` activity so that instructors can see where students get
//! stuck.  The tracker is a trait so that the compiler adapter can be tested
//! without a real backend.

use serde::Serialize;
use tracing::error;

/// Activity kind recorded for compilation failures.
pub const EXERCISE_ERROR: &str = "exercise_error";

/// Details attached to an activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDetails {
    pub details: String,
    pub framework: String,
    pub language: String,
    pub message: String,
    pub data: String,
    pub compiler: String,
}

impl ActivityDetails {
    /// Builds the record for a webpack failure of a `language` exercise.
    pub fn bundler_failure(language: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            details: message.clone(),
            framework: language.to_string(),
            language: language.to_string(),
            message,
            data: String::new(),
            compiler: "webpack".to_string(),
        }
    }
}

/// Receives activity records.
#[cfg_attr(test, mockall::automock)]
pub trait ActivityTracker: Send + Sync {
    /// Records an error activity of `kind`.
    fn error(&self, kind: &str, details: &ActivityDetails);
}

/// Tracker that writes activity records to the structured log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActivity;

impl ActivityTracker for TracingActivity {
    fn error(&self, kind: &str, details: &ActivityDetails) {
        let record = serde_json::to_string(details).unwrap_or_default();
        error!(
            activity = kind,
            language = %details.language,
            compiler = %details.compiler,
            record = %record,
            "exercise activity"
        );
    }
}
