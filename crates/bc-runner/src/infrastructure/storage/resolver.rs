//! `bc.json` resolution and exercise file access.
//!
//! [`ConfigResolver`] is built once per run.  It owns the merged
//! [`ExerciseConfig`] and is passed by reference to the compiler and test
//! adapters.
//!
//! # Where is `bc.json`?
//!
//! The first existing candidate wins:
//!
//! ```text
//! <root>/bc.json
//! <root>/.bc.json
//! <root>/.breathecode/.bc.json
//! <root>/.breathecode/bc.json      (fallback, must exist)
//! ```
//!
//! # Where are the exercises?
//!
//! | Mode         | Exercises folder                 |
//! |--------------|----------------------------------|
//! | `exercises`  | `<root>/exercises`               |
//! | `standalone` | `<root>/.breathecode/exercises`  |
//!
//! # Merge order
//!
//! The JSON document is loaded as a raw object, the language defaults are
//! written over it (defaults win), then `mode`, `editor` and `exercisesPath`
//! are written over that.  Only then is it deserialized into
//! [`ExerciseConfig`].

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use bc_core::domain::exercise::{is_student_visible, sort_by_priority};
use bc_core::{Exercise, ExerciseConfig, ExerciseFile, ExerciseStatus, Language, Mode};

use super::index::{
    ensure_dir, list_dir_sorted, render_config, scan_exercises, write_config_file,
    PendingIndexWrite,
};

/// Name of the tool's private folder inside a project.
pub const BREATHECODE_DIR: &str = ".breathecode";

/// Config file candidates, in search order.  The last one is the fallback.
pub const CONFIG_CANDIDATES: [&str; 4] = [
    "bc.json",
    ".bc.json",
    ".breathecode/.bc.json",
    ".breathecode/bc.json",
];

/// Error type for configuration and exercise file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the config file candidates exists.
    #[error(
        "impossible to load bc.json, make sure you have a ./bc.json file in {} or inside a \
         .breathecode folder (looked for {})", .root.display(), .path.display()
    )]
    ConfigNotFound { root: PathBuf, path: PathBuf },

    /// The exercises folder for the selected mode does not exist.
    #[error("you are running on {mode} mode, so make sure you have an exercises folder on {}", .path.display())]
    ExercisesPathMissing { mode: Mode, path: PathBuf },

    /// The config file is not a JSON object.
    #[error("invalid {} syntax: unable to parse: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No indexed exercise has this slug.
    #[error("exercise {0} not found")]
    ExerciseNotFound(String),

    #[error("readme file not found: {}", .0.display())]
    ReadmeNotFound(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// An exercise folder breaks the naming convention.  Aborts the index build.
    #[error("error building the exercise index: exercise directory \"{name}\" has an invalid name")]
    InvalidExerciseName { name: String },

    /// The configured `ignoreRegex` is not a valid pattern.
    #[error("invalid ignoreRegex '{pattern}': {source}")]
    InvalidIgnoreRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A file system I/O error occurred.
    #[error("I/O error accessing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config could not be serialized to JSON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Runtime overrides applied on top of `bc.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub mode: Mode,
    pub editor: Option<String>,
    /// Forces the language used to pick defaults; recorded as `language`.
    pub language: Option<String>,
}

/// Result of [`ConfigResolver::get_file`].
///
/// Reading a directory is not an error: the caller receives a readable
/// message instead of the file body, and every other failure is an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Raw file bytes.
    File(Vec<u8>),
    /// The requested name is a directory; carries a message for the student.
    Directory(String),
}

/// Owns the merged configuration of one project and serves its files.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    root: PathBuf,
    config_path: PathBuf,
    exercises_path: PathBuf,
    config: ExerciseConfig,
}

impl ConfigResolver {
    /// Locates, loads, and merges the configuration of the project at `root`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConfigNotFound`] if no config candidate exists.
    /// - [`ConfigError::ExercisesPathMissing`] if the exercises folder for
    ///   `options.mode` is absent.
    /// - [`ConfigError::ConfigParse`] if the file is not a JSON object or its
    ///   fields have the wrong types.
    pub fn resolve(root: impl Into<PathBuf>, options: ResolveOptions) -> Result<Self, ConfigError> {
        let root = absolute_root(root.into())?;
        let config_path = locate_config(&root)?;

        let exercises_path = match options.mode {
            Mode::Exercises => root.join("exercises"),
            Mode::Standalone => root.join(BREATHECODE_DIR).join("exercises"),
        };
        if !exercises_path.exists() {
            return Err(ConfigError::ExercisesPathMissing {
                mode: options.mode,
                path: exercises_path,
            });
        }

        let raw = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        let mut doc: Map<String, Value> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::ConfigParse {
                path: config_path.clone(),
                source,
            })?;

        if let Some(language) = &options.language {
            doc.insert("language".into(), Value::String(language.clone()));
        }
        let language_key = ["language", "compiler"]
            .iter()
            .find_map(|key| doc.get(*key).and_then(Value::as_str))
            .map(str::to_owned);
        match language_key.as_deref().map(|key| (key, Language::from_id(key))) {
            Some((_, Some(language))) => language.defaults().apply(&mut doc),
            Some((key, None)) => debug!("no defaults registered for language '{key}'"),
            None => debug!("{} declares no language", config_path.display()),
        }

        doc.insert("mode".into(), Value::String(options.mode.as_str().into()));
        if let Some(editor) = options.editor {
            doc.insert("editor".into(), Value::String(editor));
        }
        doc.insert(
            "exercisesPath".into(),
            Value::String(exercises_path.to_string_lossy().into_owned()),
        );

        let config: ExerciseConfig = serde_json::from_value(Value::Object(doc)).map_err(|source| {
            ConfigError::ConfigParse {
                path: config_path.clone(),
                source,
            }
        })?;

        info!(
            "loaded {} ({} exercises, language {})",
            config_path.display(),
            config.exercises.len(),
            config.language_key().unwrap_or("unset")
        );

        Ok(Self {
            root,
            config_path,
            exercises_path,
            config,
        })
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.config.exercises
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The config file that was loaded and that writes go back to.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exercises_path(&self) -> &Path {
        &self.exercises_path
    }

    fn exercise(&self, slug: &str) -> Result<&Exercise, ConfigError> {
        self.config
            .find_exercise(slug)
            .ok_or_else(|| ConfigError::ExerciseNotFound(slug.to_string()))
    }

    /// Reads the README of exercise `slug`, or the project README when `None`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`] or [`ConfigError::ReadmeNotFound`].
    pub fn get_readme(&self, slug: Option<&str>) -> Result<String, ConfigError> {
        let path = match slug {
            Some(slug) => Path::new(&self.exercise(slug)?.path).join("README.md"),
            None => self.root.join("README.md"),
        };
        if !path.is_file() {
            return Err(ConfigError::ReadmeNotFound(path));
        }
        read_to_string(&path)
    }

    /// Reads `name` inside exercise `slug`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`] or [`ConfigError::FileNotFound`].
    /// A directory is reported through [`FileContents::Directory`] instead.
    pub fn get_file(&self, slug: &str, name: &str) -> Result<FileContents, ConfigError> {
        let path = Path::new(&self.exercise(slug)?.path).join(name);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path));
        }
        if path.is_dir() {
            return Ok(FileContents::Directory(format!(
                "Error: This is not a file to be read, but a directory: {}",
                path.display()
            )));
        }
        read_bytes(&path).map(FileContents::File)
    }

    /// Reads `<root>/_assets/<name>`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::AssetNotFound`] if the asset does not exist.
    pub fn get_asset(&self, name: &str) -> Result<Vec<u8>, ConfigError> {
        let path = self.root.join("_assets").join(name);
        if !path.is_file() {
            return Err(ConfigError::AssetNotFound(path));
        }
        read_bytes(&path)
    }

    /// Overwrites an existing file of exercise `slug`.
    ///
    /// New files are never created.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`], or [`ConfigError::FileNotFound`] when
    /// the target does not exist yet (nothing is written).
    pub fn save_file(
        &self,
        slug: &str,
        name: &str,
        content: impl AsRef<[u8]>,
    ) -> Result<(), ConfigError> {
        let path = Path::new(&self.exercise(slug)?.path).join(name);
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path));
        }
        std::fs::write(&path, content).map_err(|source| ConfigError::Io { path, source })
    }

    /// Lists the files a student works on in exercise `slug`, in display order.
    ///
    /// Skips directories, test files, `README.md`, names starting with `_`,
    /// and names matching the configured `ignoreRegex`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`], [`ConfigError::InvalidIgnoreRegex`],
    /// or [`ConfigError::Io`] if the folder cannot be listed.
    pub fn get_exercise_details(&self, slug: &str) -> Result<Vec<ExerciseFile>, ConfigError> {
        let base = PathBuf::from(&self.exercise(slug)?.path);
        let ignore = self
            .config
            .ignore_regex
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidIgnoreRegex {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let mut files: Vec<ExerciseFile> = list_dir_sorted(&base)?
            .into_iter()
            .filter(|entry| is_student_visible(&entry.name) && !entry.path.is_dir())
            .filter(|entry| ignore.as_ref().map_or(true, |re| !re.is_match(&entry.name)))
            .map(|entry| ExerciseFile::new(entry.path.to_string_lossy(), entry.name))
            .collect();
        sort_by_priority(&mut files);
        Ok(files)
    }

    /// Lists every direct child of exercise `slug`, unfiltered.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`] or [`ConfigError::Io`].
    pub fn get_all_files(&self, slug: &str) -> Result<Vec<ExerciseFile>, ConfigError> {
        let base = PathBuf::from(&self.exercise(slug)?.path);
        Ok(list_dir_sorted(&base)?
            .into_iter()
            .map(|entry| ExerciseFile::new(entry.path.to_string_lossy(), entry.name))
            .collect())
    }

    /// Rebuilds the exercise index from the exercises folder.
    ///
    /// Creates `<root>/.breathecode` and the configured output folder when
    /// missing.  On success the in-memory index is replaced and the rendered
    /// configuration is returned for the caller to write.  On failure the
    /// in-memory index is left untouched.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidExerciseName`] for the first badly named folder,
    /// [`ConfigError::Io`] for file-system failures.
    pub fn build_index(&mut self) -> Result<PendingIndexWrite, ConfigError> {
        ensure_dir(&self.root.join(BREATHECODE_DIR))?;
        if let Some(output) = &self.config.output_path {
            ensure_dir(&self.root.join(output))?;
        }

        self.config.exercises = scan_exercises(&self.exercises_path)?;
        info!("indexed {} exercises", self.config.exercises.len());

        Ok(PendingIndexWrite::new(
            self.config_path.clone(),
            render_config(&self.config)?,
        ))
    }

    /// Sets the status of exercise `slug` and stamps it with the current time.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ExerciseNotFound`] if no exercise has this slug; the
    /// configuration is not modified in that case.
    pub fn update_exercise_status(
        &mut self,
        slug: &str,
        status: ExerciseStatus,
    ) -> Result<&Exercise, ConfigError> {
        let exercise = self
            .config
            .find_exercise_mut(slug)
            .ok_or_else(|| ConfigError::ExerciseNotFound(slug.to_string()))?;
        exercise.mark(status, Utc::now());
        debug!("exercise {slug} is now {}", exercise.status);
        Ok(&*exercise)
    }

    /// Persists the current configuration to [`config_path`](Self::config_path).
    ///
    /// # Errors
    ///
    /// [`ConfigError::Serialize`] or [`ConfigError::Io`].
    pub async fn save(&self) -> Result<(), ConfigError> {
        let contents = render_config(&self.config)?;
        write_config_file(&self.config_path, &contents).await
    }
}

/// Anchors a relative `root` at the process working directory, so every
/// path recorded in the index is absolute.
fn absolute_root(root: PathBuf) -> Result<PathBuf, ConfigError> {
    if root.is_absolute() {
        return Ok(root);
    }
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
        path: root.clone(),
        source,
    })?;
    Ok(join_without_cur_dir(&cwd, &root))
}

/// `base.join(rel)` with every `.` component dropped.
fn join_without_cur_dir(base: &Path, rel: &Path) -> PathBuf {
    base.join(rel)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Returns the first existing config candidate under `root`.
fn locate_config(root: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.exists())
        .ok_or_else(|| ConfigError::ConfigNotFound {
            root: root.to_path_buf(),
            path: root.join(CONFIG_CANDIDATES[CONFIG_CANDIDATES.len() - 1]),
        })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_to_string(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
