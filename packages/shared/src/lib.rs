//! Shared library for the Idobata chat application.
//!
//! Provides the pieces both binaries need: the line-delimited JSON wire
//! protocol, time utilities with a clock abstraction, and logging setup.

pub mod logger;
pub mod protocol;
pub mod time;
