//! TCP chat hub server library.
//!
//! Accepts client connections, registers a session per client and relays
//! each client's messages to every connected session.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
