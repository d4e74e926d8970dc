//! Exercise index: folder scan and persistence.
//!
//! The index is the `exercises` array of `bc.json`.  It is rebuilt from
//! scratch by scanning the exercises folder; it is never merged with the
//! previous index.
//!
//! # Scan order
//!
//! Directory entries are sorted by file name before anything else happens.
//! Exercise folders carry a two-digit position prefix, so name order is
//! teaching order.
//!
//! # Persistence
//!
//! [`ConfigResolver::build_index`](super::ConfigResolver::build_index) does
//! not write anything itself.  It returns a [`PendingIndexWrite`] holding the
//! rendered file; the caller decides when to await it.  The write consumes
//! the value, so it can happen at most once.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use bc_core::domain::naming::EXERCISE_NAME_HINT;
use bc_core::{validate_exercise_directory_name, Exercise, ExerciseConfig};

use super::resolver::ConfigError;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Lists the direct children of `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the directory cannot be read.
pub fn list_dir_sorted(dir: &Path) -> Result<Vec<DirEntry>, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Derives one pending [`Exercise`] per sub-folder of `exercises_path`.
///
/// Every folder name is checked against the naming convention; the first
/// invalid one aborts the whole scan.
///
/// # Errors
///
/// - [`ConfigError::Io`] if the folder cannot be listed.
/// - [`ConfigError::InvalidExerciseName`] for the first badly named folder.
pub fn scan_exercises(exercises_path: &Path) -> Result<Vec<Exercise>, ConfigError> {
    let mut exercises = Vec::new();

    for entry in list_dir_sorted(exercises_path)? {
        if !entry.path.is_dir() {
            continue;
        }
        let slug = entry
            .path
            .strip_prefix(exercises_path)
            .map(|rel| rel.to_string_lossy().into_owned())
            .unwrap_or_else(|_| entry.name.clone());

        if !validate_exercise_directory_name(&slug) {
            error!("exercise directory \"{slug}\" has an invalid name, {EXERCISE_NAME_HINT}");
            info!(
                "verify that the folder \"{slug}\" starts with a number and does not contain \
                 white spaces or other special characters"
            );
            return Err(ConfigError::InvalidExerciseName { name: slug });
        }

        exercises.push(Exercise::pending(slug, entry.path.to_string_lossy()));
    }

    debug!("found {} exercises in {}", exercises.len(), exercises_path.display());
    Ok(exercises)
}

/// Creates `dir` (and its parents) unless it already exists.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.is_dir() {
        return Ok(());
    }
    debug!("creating {}", dir.display());
    std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Renders the configuration the way it is stored on disk: JSON with a
/// four-space indent.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &ExerciseConfig) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config.serialize(&mut ser).map_err(ConfigError::Serialize)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `contents` to `path` asynchronously.
pub(crate) async fn write_config_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// A rendered configuration waiting to be written to disk.
///
/// Returned by [`ConfigResolver::build_index`](super::ConfigResolver::build_index).
#[derive(Debug)]
#[must_use = "the index is only persisted when `write` is awaited"]
pub struct PendingIndexWrite {
    path: PathBuf,
    contents: String,
}

impl PendingIndexWrite {
    pub(crate) fn new(path: PathBuf, contents: String) -> Self {
        Self { path, contents }
    }

    /// The configuration file that will be overwritten.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The JSON document that will be written.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Persists the index.  Single-shot: consumes `self`, no retry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written.
    pub async fn write(self) -> Result<(), ConfigError> {
        write_config_file(&self.path, &self.contents).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
