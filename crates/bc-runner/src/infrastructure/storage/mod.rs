//! Storage infrastructure: `bc.json` resolution and the exercise index.
//!
//! - `resolver` finds and loads the configuration file, merges language
//!   defaults, and serves exercise files (README, sources, assets).
//! - `index` scans the exercises folder and persists the resulting index
//!   back into the configuration file.
//!
//! Keeping every file-system access for exercises here means the compiler
//! and test adapters only ever see paths handed to them by the resolver.

pub mod index;
pub mod resolver;

pub use index::PendingIndexWrite;
pub use resolver::{ConfigError, ConfigResolver, FileContents, ResolveOptions};
