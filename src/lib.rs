//! # jsmon Library
//!
//! Poll a Linux joystick device (`/dev/input/jsN`) in non-blocking mode,
//! reconstruct the current state of every axis and button from the kernel
//! event stream, and react to state transitions at a fixed cadence.
//!
//! This library provides the core functionality: the joydev wire decoder,
//! the device state cache, the exhaustive event drain, and the decision
//! step driving LEDs, a gesture counter, and clean shutdown.

pub mod config;
pub mod error;
pub mod joystick;
pub mod led;
pub mod monitor;
pub mod pidfile;
