//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub leds: LedConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Joystick device configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DeviceConfig {
    #[serde(default = "default_device_path")]
    pub path: String,
}

/// Poll loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Refresh cadence of the decision step in milliseconds. Events are
    /// drained exhaustively every iteration regardless of this value.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Emit a summary log line every N iterations
    #[serde(default = "default_status_log_every")]
    pub status_log_every: u64,
}

/// Control bindings
///
/// Which buttons and axes drive the LEDs, the counter, and the exit
/// request. Indices are device-assigned and vary between joystick models.
#[derive(Debug, Deserialize, Clone)]
pub struct ControlsConfig {
    /// Button that toggles the green/red LED pair
    #[serde(default = "default_led_button")]
    pub led_button: u8,

    /// Button that opens the counter gate while held
    #[serde(default = "default_counter_button")]
    pub counter_button: u8,

    /// Axis whose sign moves the counter while the gate is open
    #[serde(default = "default_counter_axis")]
    pub counter_axis: u8,

    /// Axis that also opens the counter gate when past `gate_threshold`
    #[serde(default = "default_gate_axis")]
    pub gate_axis: u8,

    /// Gate opens when the gate axis value is strictly above this
    #[serde(default = "default_gate_threshold")]
    pub gate_threshold: i16,

    /// Button that requests a clean shutdown
    #[serde(default = "default_exit_button")]
    pub exit_button: u8,
}

/// LED sysfs configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LedConfig {
    /// Root of the kernel LED class
    #[serde(default = "default_led_sysfs_root")]
    pub sysfs_root: String,

    /// LED class device name for the "active" indicator
    #[serde(default = "default_green_led")]
    pub green: String,

    /// LED class device name for the "idle" indicator
    #[serde(default = "default_red_led")]
    pub red: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Log level directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// When set, daily-rotated log files are written here instead of stderr
    #[serde(default)]
    pub file_dir: Option<String>,
}

/// Process runtime configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// PID file used to enforce a single running instance
    #[serde(default = "default_pid_file")]
    pub pid_file: String,
}

// Default value functions
fn default_device_path() -> String { "/dev/input/js0".to_string() }

fn default_interval_ms() -> u64 { 100 }
fn default_status_log_every() -> u64 { 50 }

fn default_led_button() -> u8 { 0 }
fn default_counter_button() -> u8 { 1 }
fn default_counter_axis() -> u8 { 1 }
fn default_gate_axis() -> u8 { 5 }
fn default_gate_threshold() -> i16 { -32767 }
fn default_exit_button() -> u8 { 3 }

fn default_led_sysfs_root() -> String { "/sys/class/leds".to_string() }
fn default_green_led() -> String { "beaglebone:green:usr0".to_string() }
fn default_red_led() -> String { "beaglebone:green:usr1".to_string() }

fn default_log_level() -> String { "info".to_string() }

fn default_pid_file() -> String { "/tmp/jsmon.pid".to_string() }

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { path: default_device_path() }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            status_log_every: default_status_log_every(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            led_button: default_led_button(),
            counter_button: default_counter_button(),
            counter_axis: default_counter_axis(),
            gate_axis: default_gate_axis(),
            gate_threshold: default_gate_threshold(),
            exit_button: default_exit_button(),
        }
    }
}

impl Default for LedConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_led_sysfs_root(),
            green: default_green_led(),
            red: default_red_led(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { pid_file: default_pid_file() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            poll: PollConfig::default(),
            controls: ControlsConfig::default(),
            leds: LedConfig::default(),
            log: LogConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use jsmon::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.device.path.is_empty() {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("device path cannot be empty")
            ));
        }

        if self.poll.interval_ms == 0 || self.poll.interval_ms > 10000 {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("interval_ms must be between 1 and 10000")
            ));
        }

        if self.poll.status_log_every == 0 {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("status_log_every must be greater than 0")
            ));
        }

        if self.leds.sysfs_root.is_empty() {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("LED sysfs_root cannot be empty")
            ));
        }

        if self.leds.green.is_empty() || self.leds.red.is_empty() {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("LED names cannot be empty")
            ));
        }

        if self.runtime.pid_file.is_empty() {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom("pid_file cannot be empty")
            ));
        }

        if let Some(dir) = &self.log.file_dir {
            if dir.is_empty() {
                return Err(crate::error::JsmonError::Config(
                    toml::de::Error::custom("log file_dir cannot be empty when set")
                ));
            }
        }

        if self.log.level.parse::<tracing::Level>().is_err() {
            return Err(crate::error::JsmonError::Config(
                toml::de::Error::custom(format!("invalid log level: {}", self.log.level))
            ));
        }

        Ok(())
    }
}
