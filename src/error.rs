//! # Error Types
//!
//! Custom error types for jsmon using `thiserror`.

use thiserror::Error;

/// Main error type for jsmon
#[derive(Debug, Error)]
pub enum JsmonError {
    /// Joystick device node does not exist
    #[error("joystick device not found: {0}")]
    DeviceNotFound(String),

    /// Device open or capability query failed (fatal, pre-loop)
    #[error("joystick device error: {0}")]
    Device(String),

    /// A single event read failed (non-fatal, ends the current drain)
    #[error("joystick read error: {0}")]
    Read(String),

    /// LED actuation errors
    #[error("LED error: {0}")]
    Led(String),

    /// Another live instance holds the PID file
    #[error("another instance is already running (pid {0})")]
    AlreadyRunning(i32),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for jsmon
pub type Result<T> = std::result::Result<T, JsmonError>;
