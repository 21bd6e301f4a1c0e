//! # Device State Cache
//!
//! Holds the latest known value of every axis and button, reconstructed
//! from the event stream. Allocated once from the capability counts and
//! mutated one slot at a time by [`DeviceState::apply`].
//!
//! The cache is single-threaded by construction: the poll loop is the only
//! writer and the only reader, so reads are plain borrows with no locking.

use tracing::debug;

use super::device::DeviceCapabilities;
use super::protocol::{EventKind, RawEvent};

/// Latest known state of every axis and button
#[derive(Debug, Clone)]
pub struct DeviceState {
    axes: Vec<i16>,
    buttons: Vec<bool>,
    dropped: u64,
}

impl DeviceState {
    /// Allocate a zeroed cache sized from the capability counts
    pub fn new(caps: DeviceCapabilities) -> Self {
        Self {
            axes: vec![0; caps.axes as usize],
            buttons: vec![false; caps.buttons as usize],
            dropped: 0,
        }
    }

    /// Apply one event to the cache
    ///
    /// Mutates exactly one slot: an axis event writes its position, a
    /// button event writes its pressed state, an unknown kind is a no-op.
    /// Init-snapshot events are applied like any other; the init flag only
    /// marks provenance. An index past the declared capability count comes
    /// from a misbehaving device and is dropped rather than applied.
    pub fn apply(&mut self, event: &RawEvent) {
        match event.kind {
            EventKind::Axis => {
                if let Some(slot) = self.axes.get_mut(event.number as usize) {
                    *slot = event.value;
                } else {
                    self.dropped += 1;
                    debug!(number = event.number, "axis index out of range, event dropped");
                }
            }
            EventKind::Button => {
                if let Some(slot) = self.buttons.get_mut(event.number as usize) {
                    *slot = event.value != 0;
                } else {
                    self.dropped += 1;
                    debug!(number = event.number, "button index out of range, event dropped");
                }
            }
            EventKind::Unknown(_) => {}
        }
    }

    /// Position of one axis; out-of-range indices read as centered
    pub fn axis(&self, number: u8) -> i16 {
        self.axes.get(number as usize).copied().unwrap_or(0)
    }

    /// State of one button; out-of-range indices read as released
    pub fn button(&self, number: u8) -> bool {
        self.buttons.get(number as usize).copied().unwrap_or(false)
    }

    /// Current snapshot of all axis positions
    pub fn axes(&self) -> &[i16] {
        &self.axes
    }

    /// Current snapshot of all button states
    pub fn buttons(&self) -> &[bool] {
        &self.buttons
    }

    /// Number of events dropped for carrying an out-of-range index
    pub fn dropped_events(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(axes: u8, buttons: u8) -> DeviceCapabilities {
        DeviceCapabilities { axes, buttons }
    }

    fn axis_event(number: u8, value: i16) -> RawEvent {
        RawEvent { time: 0, value, kind: EventKind::Axis, is_init: false, number }
    }

    fn button_event(number: u8, value: i16) -> RawEvent {
        RawEvent { time: 0, value, kind: EventKind::Button, is_init: false, number }
    }

    #[test]
    fn test_new_state_is_zeroed() {
        let state = DeviceState::new(caps(8, 4));
        assert_eq!(state.axes(), &[0i16; 8]);
        assert_eq!(state.buttons(), &[false; 4]);
        assert_eq!(state.dropped_events(), 0);
    }

    #[test]
    fn test_apply_mutates_exactly_one_slot() {
        let mut state = DeviceState::new(caps(8, 4));
        state.apply(&axis_event(2, 5000));

        for (i, &value) in state.axes().iter().enumerate() {
            assert_eq!(value, if i == 2 { 5000 } else { 0 });
        }
        assert_eq!(state.buttons(), &[false; 4]);
    }

    #[test]
    fn test_last_write_wins_per_index() {
        let mut state = DeviceState::new(caps(4, 4));
        state.apply(&axis_event(1, 100));
        state.apply(&axis_event(1, -200));
        state.apply(&axis_event(1, 300));
        assert_eq!(state.axis(1), 300);

        state.apply(&button_event(0, 1));
        state.apply(&button_event(0, 0));
        assert!(!state.button(0));
    }

    #[test]
    fn test_init_flag_applies_identically() {
        let mut plain = DeviceState::new(caps(4, 4));
        let mut flagged = DeviceState::new(caps(4, 4));

        plain.apply(&axis_event(3, -12345));
        flagged.apply(&RawEvent { is_init: true, ..axis_event(3, -12345) });

        assert_eq!(plain.axis(3), flagged.axis(3));
    }

    #[test]
    fn test_unknown_kind_is_noop() {
        let mut state = DeviceState::new(caps(4, 4));
        state.apply(&RawEvent {
            time: 0,
            value: 1,
            kind: EventKind::Unknown(0x04),
            is_init: false,
            number: 0,
        });
        assert_eq!(state.axis(0), 0);
        assert!(!state.button(0));
        assert_eq!(state.dropped_events(), 0);
    }

    #[test]
    fn test_out_of_range_index_dropped() {
        let mut state = DeviceState::new(caps(2, 2));
        state.apply(&axis_event(2, 9000));
        state.apply(&button_event(5, 1));

        assert_eq!(state.axes(), &[0, 0]);
        assert_eq!(state.buttons(), &[false, false]);
        assert_eq!(state.dropped_events(), 2);
    }

    #[test]
    fn test_out_of_range_reads_are_neutral() {
        let state = DeviceState::new(caps(2, 2));
        assert_eq!(state.axis(200), 0);
        assert!(!state.button(200));
    }

    #[test]
    fn test_event_sequence_snapshot() {
        // Scenario: 8 axes, 4 buttons; button 0 pressed, axis 1 moved,
        // button 0 released. Snapshot keeps only the last write per slot.
        let mut state = DeviceState::new(caps(8, 4));
        state.apply(&button_event(0, 1));
        state.apply(&axis_event(1, 15000));
        state.apply(&button_event(0, 0));

        assert!(!state.button(0));
        assert_eq!(state.axis(1), 15000);
        for n in 2..8 {
            assert_eq!(state.axis(n), 0);
        }
        for n in 1..4 {
            assert!(!state.button(n));
        }
    }

    #[test]
    fn test_zero_capability_device() {
        let mut state = DeviceState::new(caps(0, 0));
        state.apply(&button_event(0, 1));
        assert!(state.axes().is_empty());
        assert!(state.buttons().is_empty());
        assert_eq!(state.dropped_events(), 1);
    }
}
