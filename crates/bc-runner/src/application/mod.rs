//! Application layer use cases for the exercise runner.
//!
//! Use cases in this layer orchestrate the resolved configuration and the
//! infrastructure adapters to fulfil one CLI request.  They depend on traits
//! (`Bundler`, `HtmlFormatter`, `ActivityTracker`, `ReportingChannel`) so the
//! tools can be swapped for doubles in tests.
//!
//! # Sub-modules
//!
//! - **`compile_exercise`** – Formats HTML, runs webpack once and reports the
//!   outcome as `compiling` / `compiler-*` events.
//!
//! - **`prepare_tests`** – Checks the jest toolchain, finds the test script
//!   and builds (or runs) the jest command line.

pub mod compile_exercise;
