//! Bundler seam: builds the browser preview of an exercise.
//!
//! The compiler use case describes one build as a [`BundleRequest`] and hands
//! it to a [`Bundler`].  The only production implementation is
//! [`webpack::WebpackCli`]; tests substitute a scripted double.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub mod webpack;

/// Everything needed to run a single preview build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRequest {
    /// The per-language webpack configuration file.
    pub config_file: PathBuf,
    /// Entry modules, relative to `working_dir` and prefixed with `./`.
    pub entries: Vec<String>,
    /// Absolute folder the bundle is written into.
    pub output_path: PathBuf,
    pub public_path: String,
    /// Folder the dev server serves static files from.
    pub content_base: String,
    /// Custom HTML template, when the project configures an existing one.
    pub html_template: Option<PathBuf>,
    pub working_dir: PathBuf,
}

/// Outcome of a build that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleStats {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Human-readable summary of the build, sent to the student verbatim.
    pub output: String,
}

impl BundleStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Error type for builds that did not produce stats.
#[derive(Debug, Error)]
pub enum BundlerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The bundler exited without printing its stats.
    #[error("bundler exited with {status}: {stderr}")]
    Crashed { status: String, stderr: String },

    #[error("bundler printed unreadable stats: {0}")]
    InvalidStats(String),
}

/// Runs preview builds.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Runs one build.  Compilation errors in the student's code are reported
    /// inside [`BundleStats`]; `Err` means the bundler itself failed.
    async fn run(&self, request: &BundleRequest) -> Result<BundleStats, BundlerError>;
}
