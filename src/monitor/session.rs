//! # Monitor Session
//!
//! Owns everything one monitoring run needs: the device state cache, the
//! gesture counter, and the run-state machine. All of it lives in this
//! struct rather than process globals, so a session can be constructed,
//! driven, and inspected in isolation.
//!
//! ## Run states
//!
//! A session starts `Running` and moves to `Exiting` when the exit button
//! is observed or an OS signal requests shutdown. `Exiting` is terminal:
//! the driving loop stops iterating and runs its cleanup pass exactly once.

use tracing::{info, warn};

use crate::config::ControlsConfig;
use crate::joystick::{DeviceCapabilities, DeviceState, EventSource};
use crate::led::{Led, LedSink};
use super::poller;

/// Run-state machine of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Normal operation, keep iterating
    Running,
    /// Shutdown requested; terminal
    Exiting,
}

/// Outcome of evaluating one state snapshot against the control bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub green_led: bool,
    pub red_led: bool,
    /// Counter movement for this iteration: -1, 0 or +1
    pub counter_step: i64,
    /// Whether the exit control is held
    pub exit: bool,
}

/// Evaluate the decision policy against a state snapshot
///
/// Pure function of the snapshot and the bindings:
/// - LED button held lights the green LED, released lights the red one.
/// - The counter moves by the sign of the counter axis, but only while the
///   gate is open: counter button held, or gate axis strictly above its
///   threshold.
/// - The exit button requests shutdown.
pub fn evaluate(state: &DeviceState, controls: &ControlsConfig) -> Decision {
    let led_on = state.button(controls.led_button);

    let gate_open = state.button(controls.counter_button)
        || state.axis(controls.gate_axis) > controls.gate_threshold;
    let counter_step = if gate_open {
        state.axis(controls.counter_axis).signum() as i64
    } else {
        0
    };

    Decision {
        green_led: led_on,
        red_led: !led_on,
        counter_step,
        exit: state.button(controls.exit_button),
    }
}

/// One monitoring run: cache, counter, and run state
pub struct Session {
    state: DeviceState,
    controls: ControlsConfig,
    counter: i64,
    run_state: RunState,
    iterations: u64,
    status_log_every: u64,
}

impl Session {
    /// Create a session for a device with the given capabilities
    pub fn new(caps: DeviceCapabilities, controls: ControlsConfig, status_log_every: u64) -> Self {
        Self {
            state: DeviceState::new(caps),
            controls,
            counter: 0,
            run_state: RunState::Running,
            iterations: 0,
            status_log_every: status_log_every.max(1),
        }
    }

    /// Whether the driving loop should keep iterating
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Request a cooperative shutdown (signal handler path)
    ///
    /// Takes effect at the loop's next top-of-iteration check; the current
    /// iteration always finishes so cleanup never races a half-applied tick.
    pub fn request_exit(&mut self) {
        self.run_state = RunState::Exiting;
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Run one poll iteration: drain, decide, actuate
    ///
    /// Drains every queued event into the cache, evaluates the decision
    /// policy once against the resulting snapshot, drives the LEDs, moves
    /// the counter, and latches the exit request. Runs the decision step
    /// even when no events arrived, so steady state keeps rendering.
    ///
    /// Returns the status line for this iteration.
    pub fn tick<S: EventSource, L: LedSink>(&mut self, source: &mut S, leds: &mut L) -> String {
        let outcome = poller::drain(source, &mut self.state);
        if let Some(err) = outcome.read_error {
            warn!("joystick read failed, continuing on last known state: {}", err);
        }

        let decision = evaluate(&self.state, &self.controls);

        if let Err(e) = leds.set(Led::Green, decision.green_led) {
            warn!("failed to drive green LED: {}", e);
        }
        if let Err(e) = leds.set(Led::Red, decision.red_led) {
            warn!("failed to drive red LED: {}", e);
        }

        self.counter += decision.counter_step;

        if decision.exit && self.run_state == RunState::Running {
            info!("exit button {} pressed, shutting down", self.controls.exit_button);
            self.run_state = RunState::Exiting;
        }

        self.iterations += 1;
        if self.iterations % self.status_log_every == 0 {
            info!(
                iterations = self.iterations,
                events = outcome.applied,
                counter = self.counter,
                dropped = self.state.dropped_events(),
                "monitor heartbeat"
            );
        }

        self.status_line()
    }

    /// Render the status line for the bound controls
    pub fn status_line(&self) -> String {
        let c = &self.controls;
        format!(
            "BUTTONS: {:2}:{} {:2}:{} {:2}:{}  | AXES: {:2}:{:6} {:2}:{:6}  | COUNTER: {}",
            c.led_button,
            u8::from(self.state.button(c.led_button)),
            c.counter_button,
            u8::from(self.state.button(c.counter_button)),
            c.exit_button,
            u8::from(self.state.button(c.exit_button)),
            c.counter_axis,
            self.state.axis(c.counter_axis),
            c.gate_axis,
            self.state.axis(c.gate_axis),
            self.counter,
        )
    }
}
