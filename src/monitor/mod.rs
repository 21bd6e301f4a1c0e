//! # Monitor Module
//!
//! The poll loop core: exhaustive non-blocking event drains feeding the
//! device state cache, and the fixed-cadence decision step that reacts to
//! the reconstructed state.

pub mod poller;
pub mod session;

pub use poller::{drain, DrainOutcome};
pub use session::{evaluate, Decision, RunState, Session};
