//! Reporting-channel vocabulary.
//!
//! The compiler and test adapters never return their outcome to the caller;
//! they emit events on an injected channel instead.  This module defines the
//! event names and their JSON framing.

pub mod events;
