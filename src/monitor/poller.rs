//! # Event Drain
//!
//! Pulls every currently-queued event out of the device and into the state
//! cache without blocking. Bursts of events (rapid button mashing) are
//! absorbed in full every iteration; the poll cadence bounds the decision
//! rate, never the drain rate.

use crate::error::JsmonError;
use crate::joystick::{DeviceState, EventSource};

/// Result of one exhaustive drain pass
#[derive(Debug)]
pub struct DrainOutcome {
    /// Number of events applied to the cache
    pub applied: usize,
    /// Read failure that ended the drain early, if any
    pub read_error: Option<JsmonError>,
}

/// Drain all queued events from `source` into `state`
///
/// Reads until the source reports an empty queue. A read failure ends the
/// drain for this iteration but is not fatal: whatever state accumulated
/// so far stands, and the caller proceeds to its decision step.
pub fn drain<S: EventSource>(source: &mut S, state: &mut DeviceState) -> DrainOutcome {
    let mut applied = 0;
    loop {
        match source.next_event() {
            Ok(Some(event)) => {
                state.apply(&event);
                applied += 1;
            }
            Ok(None) => {
                return DrainOutcome { applied, read_error: None };
            }
            Err(e) => {
                return DrainOutcome { applied, read_error: Some(e) };
            }
        }
    }
}
