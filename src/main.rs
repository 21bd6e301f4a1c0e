//! # jsmon
//!
//! Monitor a Linux joystick and drive status LEDs and a gesture counter.
//!
//! The daemon opens the joystick device in non-blocking mode, queries its
//! capabilities once, then loops at a fixed cadence: drain every queued
//! event into the state cache, run one decision step against the snapshot,
//! render a status line. A designated button, ctrl-c, or SIGTERM requests
//! a cooperative shutdown; cleanup (LEDs off, PID file removed) runs
//! exactly once after the loop exits.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{interval, Duration};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use jsmon::config::{Config, LogConfig};
use jsmon::joystick::JoystickDevice;
use jsmon::led::{LedSink, SysfsLeds};
use jsmon::monitor::Session;
use jsmon::pidfile::PidFile;

/// Configuration file consulted when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main entry point for jsmon
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (explicit path, default path, or built-ins)
///    - Set up logging with tracing subscriber
///    - Acquire the PID file (refuses to run twice)
///    - Open the joystick device and query its capabilities
///
/// 2. **Main Loop**
///    - Every poll interval: drain all queued events, run the decision
///      step, drive the LEDs, update the status line
///    - ctrl-c and SIGTERM request a cooperative exit
///
/// 3. **Cleanup**
///    - Turn both LEDs off
///    - Remove the PID file
///
/// # Errors
///
/// Returns error if:
/// - The configuration is invalid
/// - Another instance is already running
/// - The joystick device cannot be opened or queried
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = init_tracing(&config.log)?;

    info!("jsmon v{} starting...", env!("CARGO_PKG_VERSION"));

    let pid_file = PidFile::acquire(&config.runtime.pid_file)?;

    let mut device = JoystickDevice::open(&config.device.path)?;
    let caps = device.capabilities();
    let (major, minor, patch) = device.driver_version();
    info!(
        "opened {} ({}): {} axes, {} buttons, driver {}.{}.{}",
        device.device_path(),
        device.name().unwrap_or("unnamed device"),
        caps.axes,
        caps.buttons,
        major,
        minor,
        patch
    );

    let controls = &config.controls;
    info!("press and release button {} to switch the green and red LEDs", controls.led_button);
    info!(
        "hold button {} (or push axis {} past {}) and move axis {} to change the counter",
        controls.counter_button, controls.gate_axis, controls.gate_threshold, controls.counter_axis
    );
    info!("press button {} to exit", controls.exit_button);

    let mut leds = SysfsLeds::new(&config.leds);
    let mut session = Session::new(caps, config.controls.clone(), config.poll.status_log_every);

    let mut sigterm = signal(SignalKind::terminate())
        .context("failed to install SIGTERM handler")?;
    let mut tick = interval(Duration::from_millis(config.poll.interval_ms));
    let mut stdout = std::io::stdout();

    // Keep looping until the session leaves the running state
    while session.is_running() {
        tokio::select! {
            _ = tick.tick() => {
                let line = session.tick(&mut device, &mut leds);
                let _ = write!(stdout, "\r{}", line);
                let _ = stdout.flush();
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received ctrl-c, shutting down...");
                session.request_exit();
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down...");
                session.request_exit();
            }
        }
    }

    // Single cleanup pass after the loop
    println!();
    if let Err(e) = leds.all_off() {
        tracing::warn!("failed to turn LEDs off: {}", e);
    }
    info!("counter finished at {}", session.counter());
    pid_file.release().context("failed to remove PID file")?;
    info!("goodbye");

    Ok(())
}

/// Load configuration from the CLI argument, the default path, or built-ins
fn load_config() -> Result<Config> {
    match std::env::args().nth(1) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("failed to load config from {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("failed to load config from {}", DEFAULT_CONFIG_PATH)),
        None => Ok(Config::default()),
    }
}

/// Initialize the tracing subscriber
///
/// Logs go to stderr so the status line owns stdout; when `file_dir` is
/// set, daily-rotated files are written through a non-blocking appender
/// whose guard must stay alive for the process lifetime.
fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let level: tracing::Level = config
        .level
        .parse()
        .with_context(|| format!("invalid log level: {}", config.level))?;
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(level.into());

    match &config.file_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "jsmon.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}
