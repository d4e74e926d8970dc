//! Domain entities for the bc exercise runner.
//!
//! This module contains pure business logic with no infrastructure
//! dependencies: no file system access, no child processes, no sockets.
//! Everything here can be compiled and tested on any platform without any
//! external setup.
//!
//! Code in outer layers (the config resolver, the compiler and test
//! adapters, the CLI) depends on the domain, but the domain never depends on
//! them.

/// The merged `bc.json` configuration record.
pub mod config;

/// Exercises, their lifecycle status, and exercise file ordering.
pub mod exercise;

/// Language identifiers, their defaults, and their bundler profiles.
pub mod language;

/// Exercise folder naming convention.
pub mod naming;
