//! # LED Module
//!
//! Drives two status LEDs through the kernel LED class
//! (`/sys/class/leds/<name>/brightness`). Actuation sits behind the
//! [`LedSink`] trait so the monitor session can be tested against an
//! in-memory mock.
//!
//! LED failures are never fatal: the state cache must keep advancing even
//! on hardware without the expected LED devices, so a failing sink logs
//! once and goes quiet.

use std::fs;
use std::path::PathBuf;
use tracing::warn;

use crate::config::LedConfig;
use crate::error::{JsmonError, Result};

/// The two status LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Lit while the LED button is held
    Green,
    /// Lit while the LED button is released
    Red,
}

/// Trait for binary LED outputs
pub trait LedSink {
    /// Set one LED on or off
    fn set(&mut self, led: Led, on: bool) -> Result<()>;

    /// Turn every LED off (cleanup pass)
    fn all_off(&mut self) -> Result<()> {
        self.set(Led::Green, false)?;
        self.set(Led::Red, false)
    }
}

/// Sysfs-backed LED pair
pub struct SysfsLeds {
    green: PathBuf,
    red: PathBuf,
    /// Set after the first write failure; later writes are skipped
    disabled: bool,
}

impl SysfsLeds {
    /// Build the LED pair from configuration
    ///
    /// Paths are not probed here; a missing LED device surfaces as a
    /// single warning on the first write.
    pub fn new(config: &LedConfig) -> Self {
        let root = PathBuf::from(&config.sysfs_root);
        Self {
            green: root.join(&config.green).join("brightness"),
            red: root.join(&config.red).join("brightness"),
            disabled: false,
        }
    }

    fn write(&self, led: Led, on: bool) -> Result<()> {
        let path = match led {
            Led::Green => &self.green,
            Led::Red => &self.red,
        };
        fs::write(path, if on { "1" } else { "0" }).map_err(|e| {
            JsmonError::Led(format!("write to {} failed: {}", path.display(), e))
        })
    }
}

impl LedSink for SysfsLeds {
    fn set(&mut self, led: Led, on: bool) -> Result<()> {
        if self.disabled {
            return Ok(());
        }
        if let Err(e) = self.write(led, on) {
            self.disabled = true;
            warn!("{}; disabling LED output", e);
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;

    /// In-memory LED sink recording every transition
    pub struct MockLeds {
        pub history: Vec<(Led, bool)>,
        pub fail: bool,
    }

    impl MockLeds {
        pub fn new() -> Self {
            Self { history: Vec::new(), fail: false }
        }

        /// Last state written for one LED, if any
        pub fn last(&self, led: Led) -> Option<bool> {
            self.history
                .iter()
                .rev()
                .find(|(l, _)| *l == led)
                .map(|&(_, on)| on)
        }
    }

    impl LedSink for MockLeds {
        fn set(&mut self, led: Led, on: bool) -> Result<()> {
            if self.fail {
                return Err(JsmonError::Led("mock LED failure".to_string()));
            }
            self.history.push((led, on));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockLeds;
    use super::*;
    use crate::config::LedConfig;
    use tempfile::TempDir;

    fn sysfs_fixture() -> (TempDir, LedConfig) {
        let dir = TempDir::new().unwrap();
        for name in ["green-led", "red-led"] {
            let led_dir = dir.path().join(name);
            fs::create_dir(&led_dir).unwrap();
            fs::write(led_dir.join("brightness"), "0").unwrap();
        }
        let config = LedConfig {
            sysfs_root: dir.path().to_string_lossy().into_owned(),
            green: "green-led".to_string(),
            red: "red-led".to_string(),
        };
        (dir, config)
    }

    #[test]
    fn test_sysfs_writes_brightness() {
        let (dir, config) = sysfs_fixture();
        let mut leds = SysfsLeds::new(&config);

        leds.set(Led::Green, true).unwrap();
        leds.set(Led::Red, false).unwrap();

        let green = fs::read_to_string(dir.path().join("green-led/brightness")).unwrap();
        let red = fs::read_to_string(dir.path().join("red-led/brightness")).unwrap();
        assert_eq!(green, "1");
        assert_eq!(red, "0");
    }

    #[test]
    fn test_all_off() {
        let (dir, config) = sysfs_fixture();
        let mut leds = SysfsLeds::new(&config);

        leds.set(Led::Green, true).unwrap();
        leds.set(Led::Red, true).unwrap();
        leds.all_off().unwrap();

        let green = fs::read_to_string(dir.path().join("green-led/brightness")).unwrap();
        let red = fs::read_to_string(dir.path().join("red-led/brightness")).unwrap();
        assert_eq!(green, "0");
        assert_eq!(red, "0");
    }

    #[test]
    fn test_missing_led_disables_quietly() {
        let config = LedConfig {
            sysfs_root: "/nonexistent/leds".to_string(),
            green: "green-led".to_string(),
            red: "red-led".to_string(),
        };
        let mut leds = SysfsLeds::new(&config);

        // First write fails internally, disables the sink, returns Ok
        assert!(leds.set(Led::Green, true).is_ok());
        assert!(leds.set(Led::Red, true).is_ok());
        assert!(leds.disabled);
    }

    #[test]
    fn test_mock_records_transitions() {
        let mut leds = MockLeds::new();
        leds.set(Led::Green, true).unwrap();
        leds.set(Led::Green, false).unwrap();
        leds.set(Led::Red, true).unwrap();

        assert_eq!(leds.history.len(), 3);
        assert_eq!(leds.last(Led::Green), Some(false));
        assert_eq!(leds.last(Led::Red), Some(true));
    }
}
