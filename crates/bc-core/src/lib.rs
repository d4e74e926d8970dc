//! # bc-core
//!
//! Shared library for the bc exercise runner containing the exercise model,
//! the exercise folder naming rules, the per-language defaults table, and the
//! vocabulary of the reporting channel.
//!
//! This crate has zero dependencies on the file system, child processes, or
//! async runtimes.  Everything that touches the disk lives in `bc-runner`.
//!
//! # Architecture overview (for beginners)
//!
//! An exercise project is a folder containing a `bc.json` configuration file
//! and an `exercises/` directory.  Every sub-folder of `exercises/` is one
//! coding task with its own `README.md`, source files, and tests.
//!
//! - **`domain`** – Pure business rules: what a valid exercise folder name
//!   looks like, how exercise files are ordered for display, and what defaults
//!   each language brings along.
//!
//! - **`protocol`** – The events the runner emits while compiling or testing
//!   an exercise, and their JSON shape on the wire.

pub mod domain;
pub mod protocol;

pub use domain::config::{ExerciseConfig, Mode};
pub use domain::exercise::{Exercise, ExerciseFile, ExerciseStatus};
pub use domain::language::{BundlerProfile, Language, LanguageDefaults};
pub use domain::naming::validate_exercise_directory_name;
pub use protocol::events::{ChannelEvent, EventMessage};
