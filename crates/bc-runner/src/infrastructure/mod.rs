//! Infrastructure layer for the exercise runner.
//!
//! Contains the adapters that touch the outside world: the `bc.json` file and
//! exercise folders, the reporting channel, the webpack and prettier command
//! lines, the activity tracker, and `PATH` lookups.
//!
//! **Dependency rule**: this layer may depend on `bc_core`, but the tool
//! adapters (`bundler`, `formatter`, `channel`, `activity`) never call into
//! `application`.

pub mod activity;
pub mod bundler;
pub mod channel;
pub mod formatter;
pub mod storage;
pub mod toolchain;
