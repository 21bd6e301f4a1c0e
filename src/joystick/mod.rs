//! # Joystick Module
//!
//! Linux joystick (joydev) input handling.
//!
//! This module handles:
//! - Decoding the kernel `js_event` wire record
//! - Opening `/dev/input/jsN` in non-blocking mode
//! - Querying device capabilities (axis and button counts)
//! - Reconstructing the current device state from the event stream

pub mod device;
pub mod protocol;
pub mod state;

pub use device::{DeviceCapabilities, EventSource, JoystickDevice};
pub use protocol::{EventKind, RawEvent};
pub use state::DeviceState;
