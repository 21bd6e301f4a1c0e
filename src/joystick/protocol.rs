//! # Joydev Wire Protocol
//!
//! Decoding of the fixed-size event record emitted by the Linux joystick
//! driver on `/dev/input/jsN`.
//!
//! ## Record layout
//!
//! Each read from the device yields exactly 8 bytes in native endianness:
//!
//! | field  | type | meaning                                   |
//! |--------|------|-------------------------------------------|
//! | time   | u32  | event timestamp in milliseconds           |
//! | value  | i16  | axis position or button state             |
//! | type   | u8   | event kind, possibly with the init bit    |
//! | number | u8   | axis or button index                      |
//!
//! The high bit of `type` marks an init event: a synthetic record emitted
//! once per control at device-open to report its current value. It is
//! stripped here, once, so the rest of the crate never sees raw bits.

use bytes::Buf;

/// Size of one kernel event record in bytes
pub const JS_EVENT_SIZE: usize = 8;

/// Event type bit: button pressed or released
pub const JS_EVENT_BUTTON: u8 = 0x01;

/// Event type bit: axis moved
pub const JS_EVENT_AXIS: u8 = 0x02;

/// Event type modifier bit: initial state snapshot emitted at device open
pub const JS_EVENT_INIT: u8 = 0x80;

/// Minimum axis position reported by the driver
pub const AXIS_MIN: i16 = -32767;

/// Maximum axis position reported by the driver
pub const AXIS_MAX: i16 = 32767;

/// Decoded event kind, with the init modifier already stripped
///
/// Kinds the driver may grow in the future decode to `Unknown` and are
/// ignored downstream instead of failing the drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Button pressed or released
    Button,
    /// Axis moved
    Axis,
    /// Unrecognized event type bits
    Unknown(u8),
}

/// One decoded joystick event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    /// Driver timestamp in milliseconds
    pub time: u32,
    /// Axis position (-32767..=32767) or button state (0/1)
    pub value: i16,
    /// Event kind with the init bit stripped
    pub kind: EventKind,
    /// Whether this event is an initial state snapshot
    pub is_init: bool,
    /// Index of the axis or button that generated the event
    pub number: u8,
}

/// Decode one kernel event record
///
/// Infallible: every 8-byte record decodes to *some* event, unknown type
/// bits included.
pub fn decode_event(record: &[u8; JS_EVENT_SIZE]) -> RawEvent {
    let mut buf = &record[..];
    let time = buf.get_u32_ne();
    let value = buf.get_i16_ne();
    let type_bits = buf.get_u8();
    let number = buf.get_u8();

    let is_init = type_bits & JS_EVENT_INIT != 0;
    let kind = match type_bits & !JS_EVENT_INIT {
        JS_EVENT_BUTTON => EventKind::Button,
        JS_EVENT_AXIS => EventKind::Axis,
        other => EventKind::Unknown(other),
    };

    RawEvent { time, value, kind, is_init, number }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw record the way the kernel lays it out
    fn record(time: u32, value: i16, type_bits: u8, number: u8) -> [u8; JS_EVENT_SIZE] {
        let mut buf = [0u8; JS_EVENT_SIZE];
        buf[0..4].copy_from_slice(&time.to_ne_bytes());
        buf[4..6].copy_from_slice(&value.to_ne_bytes());
        buf[6] = type_bits;
        buf[7] = number;
        buf
    }

    #[test]
    fn test_decode_button_press() {
        let event = decode_event(&record(1234, 1, JS_EVENT_BUTTON, 3));
        assert_eq!(event.time, 1234);
        assert_eq!(event.value, 1);
        assert_eq!(event.kind, EventKind::Button);
        assert!(!event.is_init);
        assert_eq!(event.number, 3);
    }

    #[test]
    fn test_decode_axis_move() {
        let event = decode_event(&record(99, -15000, JS_EVENT_AXIS, 1));
        assert_eq!(event.kind, EventKind::Axis);
        assert_eq!(event.value, -15000);
        assert_eq!(event.number, 1);
    }

    #[test]
    fn test_decode_strips_init_bit() {
        let event = decode_event(&record(0, 1, JS_EVENT_BUTTON | JS_EVENT_INIT, 0));
        assert_eq!(event.kind, EventKind::Button);
        assert!(event.is_init);

        let event = decode_event(&record(0, 32767, JS_EVENT_AXIS | JS_EVENT_INIT, 5));
        assert_eq!(event.kind, EventKind::Axis);
        assert!(event.is_init);
        assert_eq!(event.value, AXIS_MAX);
    }

    #[test]
    fn test_decode_unknown_kind() {
        let event = decode_event(&record(0, 0, 0x04, 0));
        assert_eq!(event.kind, EventKind::Unknown(0x04));
        assert!(!event.is_init);

        // Init bit is stripped before kind classification
        let event = decode_event(&record(0, 0, 0x04 | JS_EVENT_INIT, 0));
        assert_eq!(event.kind, EventKind::Unknown(0x04));
        assert!(event.is_init);
    }

    #[test]
    fn test_axis_range_constants() {
        assert_eq!(AXIS_MIN, -32767);
        assert_eq!(AXIS_MAX, 32767);
        assert_eq!(JS_EVENT_SIZE, 8);
    }
}
