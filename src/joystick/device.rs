//! # Joystick Device Handle
//!
//! Opens a joydev device node (`/dev/input/jsN`) in non-blocking mode and
//! performs the one-time capability query through the joydev ioctls.
//!
//! The device is read through the [`EventSource`] trait so the poll loop
//! can be driven by a scripted mock in tests.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use tracing::debug;

use crate::error::{JsmonError, Result};
use super::protocol::{self, RawEvent, JS_EVENT_SIZE};

// joydev ioctl request numbers (linux/joystick.h)
const JSIOCGAXES: libc::c_ulong = 0x8001_6a11;
const JSIOCGBUTTONS: libc::c_ulong = 0x8001_6a12;
const JSIOCGVERSION: libc::c_ulong = 0x8004_6a01;
// JSIOCGNAME with a 64-byte buffer
const JSIOCGNAME_64: libc::c_ulong = 0x8040_6a13;
const NAME_BUF_LEN: usize = 64;

/// Axis and button counts reported by the driver at device open
///
/// Queried exactly once; the counts never change during a session and size
/// all state containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub axes: u8,
    pub buttons: u8,
}

/// Source of decoded joystick events
///
/// `Ok(Some(event))` yields the next queued event, `Ok(None)` means the
/// queue is currently empty (the non-blocking "would block" signal), and
/// `Err` is a genuine read failure.
pub trait EventSource {
    /// Read the next queued event, or report an empty queue
    fn next_event(&mut self) -> Result<Option<RawEvent>>;
}

/// Handle to an open joystick device
///
/// # Examples
///
/// ```no_run
/// use jsmon::joystick::{EventSource, JoystickDevice};
///
/// let mut device = JoystickDevice::open("/dev/input/js0")?;
/// let caps = device.capabilities();
/// println!("{} axes, {} buttons", caps.axes, caps.buttons);
///
/// while let Some(event) = device.next_event()? {
///     println!("{:?}", event);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JoystickDevice {
    file: File,
    device_path: String,
    capabilities: DeviceCapabilities,
    name: Option<String>,
    driver_version: u32,
}

impl std::fmt::Debug for JoystickDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoystickDevice")
            .field("device_path", &self.device_path)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl JoystickDevice {
    /// Open a joystick device node in non-blocking mode
    ///
    /// Queries axis and button counts, the driver version, and the device
    /// name immediately after opening.
    ///
    /// # Errors
    ///
    /// - `DeviceNotFound`: the device node does not exist
    /// - `Device`: open or capability query failed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(JsmonError::DeviceNotFound(path.display().to_string()));
        }

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
            .map_err(|e| JsmonError::Device(format!("failed to open {}: {}", path.display(), e)))?;

        let fd = file.as_raw_fd();
        let axes = query_count(fd, JSIOCGAXES, "axis count")?;
        let buttons = query_count(fd, JSIOCGBUTTONS, "button count")?;
        let driver_version = query_version(fd)?;
        let name = query_name(fd);

        debug!(
            axes,
            buttons,
            "opened joystick device {}",
            path.display()
        );

        Ok(Self {
            file,
            device_path: path.display().to_string(),
            capabilities: DeviceCapabilities { axes, buttons },
            name,
            driver_version,
        })
    }

    /// Device node path this handle was opened from
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Axis and button counts queried at open
    pub fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    /// Human-readable device name, if the driver reports one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Driver version as (major, minor, patch)
    pub fn driver_version(&self) -> (u8, u8, u8) {
        let v = self.driver_version;
        ((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }
}

impl EventSource for JoystickDevice {
    fn next_event(&mut self) -> Result<Option<RawEvent>> {
        let mut record = [0u8; JS_EVENT_SIZE];
        loop {
            return match self.file.read(&mut record) {
                // joydev only ever hands out whole records
                Ok(JS_EVENT_SIZE) => Ok(Some(protocol::decode_event(&record))),
                Ok(0) => Err(JsmonError::Read("device returned end of stream".to_string())),
                Ok(n) => Err(JsmonError::Read(format!("short read of {} bytes", n))),
                // EAGAIN: the queue is empty, not an error
                Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => Err(JsmonError::Read(e.to_string())),
            };
        }
    }
}

/// Query a one-byte count ioctl (JSIOCGAXES / JSIOCGBUTTONS)
fn query_count(fd: RawFd, request: libc::c_ulong, what: &str) -> Result<u8> {
    let mut count: u8 = 0;
    // SAFETY: both requests write a single byte into the out-parameter.
    let rc = unsafe { libc::ioctl(fd, request, &mut count) };
    if rc < 0 {
        return Err(JsmonError::Device(format!(
            "{} query failed: {}",
            what,
            std::io::Error::last_os_error()
        )));
    }
    Ok(count)
}

fn query_version(fd: RawFd) -> Result<u32> {
    let mut version: u32 = 0;
    // SAFETY: JSIOCGVERSION writes a u32 into the out-parameter.
    let rc = unsafe { libc::ioctl(fd, JSIOCGVERSION, &mut version) };
    if rc < 0 {
        return Err(JsmonError::Device(format!(
            "driver version query failed: {}",
            std::io::Error::last_os_error()
        )));
    }
    Ok(version)
}

/// Best-effort device name query; a missing name is not an error
fn query_name(fd: RawFd) -> Option<String> {
    let mut buf = [0u8; NAME_BUF_LEN];
    // SAFETY: JSIOCGNAME_64 writes at most NAME_BUF_LEN bytes into buf.
    let rc = unsafe { libc::ioctl(fd, JSIOCGNAME_64, buf.as_mut_ptr()) };
    if rc < 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..end]).into_owned();
    if name.is_empty() { None } else { Some(name) }
}
