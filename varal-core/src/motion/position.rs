//! Non-blocking position control
//!
//! [`PositionController`] owns the coil outputs and the optional end-stop. It
//! keeps an absolute position modulo one revolution and takes at most one
//! half-step per [`tick`](PositionController::tick), gated by the step
//! interval derived from the configured speed.

use crate::config::MotorConfig;
use crate::motion::homing::{HomingOutcome, HomingProgress};
use crate::motion::sequencer::StepSequencer;
use crate::scheduler::IntervalGate;
use crate::state::{MotionEvent, MotorState};
use crate::traits::{CoilDriver, Direction, Endstop, NoEndstop};

/// Convert an angle in degrees to a half-step position
///
/// Any finite angle is first reduced into `[0, 360)`. A result that rounds up
/// to a full revolution is clamped to the last step. Non-finite input maps
/// to zero.
pub fn angle_to_steps(degrees: f32, steps_per_rev: u32) -> u32 {
    if !degrees.is_finite() || steps_per_rev == 0 {
        return 0;
    }

    let mut normalized = libm::fmodf(degrees, 360.0);
    if normalized < 0.0 {
        normalized += 360.0;
    }

    let steps = libm::roundf(normalized / 360.0 * steps_per_rev as f32);
    if steps >= steps_per_rev as f32 {
        steps_per_rev - 1
    } else {
        steps as u32
    }
}

/// Step interval in microseconds for a speed, `None` if the motor is stalled
fn step_interval_us(steps_per_s: f32) -> Option<u64> {
    if steps_per_s.is_finite() && steps_per_s > 0.0 {
        Some((1_000_000.0 / steps_per_s) as u64)
    } else {
        None
    }
}

/// Absolute position controller for one stepper
pub struct PositionController<D, E = NoEndstop> {
    driver: D,
    endstop: Option<E>,
    sequencer: StepSequencer,
    steps_per_rev: u32,
    /// Position in `[0, steps_per_rev)`
    current: u32,
    /// Target in `[0, steps_per_rev)`
    target: u32,
    state: MotorState,
    speed_steps_per_s: f32,
    step_gate: IntervalGate,
    homing: HomingProgress,
    homing_direction: Direction,
    homing_step_limit: u32,
}

impl<D: CoilDriver> PositionController<D, NoEndstop> {
    /// Create a controller for a mechanism without a reference switch
    ///
    /// The boot position is taken as zero, so the controller reports itself
    /// homed immediately.
    pub fn without_endstop(driver: D, config: &MotorConfig) -> Self {
        Self::new(driver, None, config)
    }
}

impl<D: CoilDriver, E: Endstop> PositionController<D, E> {
    /// Create a controller at position 0, idle, with phase 0 energized
    ///
    /// With `endstop = None` the controller is considered homed.
    pub fn new(mut driver: D, endstop: Option<E>, config: &MotorConfig) -> Self {
        let sequencer = StepSequencer::new();
        sequencer.apply(&mut driver);

        let homed = endstop.is_none();
        let mut controller = Self {
            driver,
            endstop,
            sequencer,
            steps_per_rev: config.steps_per_rev.max(1),
            current: 0,
            target: 0,
            state: MotorState::Idle,
            speed_steps_per_s: 0.0,
            step_gate: IntervalGate::never(),
            homing: HomingProgress::new(homed),
            homing_direction: config.homing_direction,
            homing_step_limit: config.homing_step_limit().max(1),
        };
        controller.set_speed(config.speed_steps_per_s);
        controller
    }

    /// Set an absolute target in half-steps
    ///
    /// Any value is accepted and reduced modulo one revolution. Redirects a
    /// move already in progress. Ignored while homing, in which case `false`
    /// is returned.
    pub fn set_target(&mut self, target_steps: i64) -> bool {
        if self.state == MotorState::Homing {
            return false;
        }

        self.target = target_steps.rem_euclid(self.steps_per_rev as i64) as u32;
        self.state = if self.target == self.current {
            MotorState::Idle
        } else {
            MotorState::Moving
        };
        true
    }

    /// Set the target as an angle in degrees
    pub fn set_target_angle(&mut self, degrees: f32) -> bool {
        let steps = self.angle_to_steps(degrees);
        self.set_target(steps as i64)
    }

    /// Move `delta` half-steps relative to the current position
    pub fn move_relative(&mut self, delta: i64) -> bool {
        let target = (self.current as i64).saturating_add(delta);
        self.set_target(target)
    }

    /// Convert degrees to half-steps for this motor
    pub fn angle_to_steps(&self, degrees: f32) -> u32 {
        angle_to_steps(degrees, self.steps_per_rev)
    }

    /// Change the step rate
    ///
    /// A non-positive speed stalls the motor without cancelling the current
    /// move or homing attempt; it resumes when a positive speed is set.
    pub fn set_speed(&mut self, steps_per_s: f32) {
        let interval = step_interval_us(steps_per_s);
        self.speed_steps_per_s = if interval.is_some() { steps_per_s } else { 0.0 };
        self.step_gate.set_interval(interval);
    }

    /// Begin searching for the reference switch
    ///
    /// Returns `false` (and does nothing) when no switch is fitted.
    pub fn start_homing(&mut self) -> bool {
        if self.endstop.is_none() {
            return false;
        }
        self.homing.restart();
        self.state = MotorState::Homing;
        true
    }

    /// Advance by at most one half-step
    pub fn tick(&mut self, now_us: u64) -> MotionEvent {
        match self.state {
            MotorState::Idle => MotionEvent::Idle,
            _ if !self.step_gate.try_take(now_us) => MotionEvent::Waiting,
            MotorState::Moving => self.step_toward_target(),
            MotorState::Homing => self.homing_step(),
        }
    }

    fn step_toward_target(&mut self) -> MotionEvent {
        let Some(direction) = self.direction() else {
            self.state = MotorState::Idle;
            return MotionEvent::Arrived {
                position: self.current,
            };
        };

        self.step(direction);

        if self.current == self.target {
            self.state = MotorState::Idle;
            MotionEvent::Arrived {
                position: self.current,
            }
        } else {
            MotionEvent::Stepped {
                position: self.current,
            }
        }
    }

    fn homing_step(&mut self) -> MotionEvent {
        if self.endstop.is_none() {
            self.state = MotorState::Idle;
            return MotionEvent::Idle;
        }

        self.step(self.homing_direction);
        let triggered = self
            .endstop
            .as_mut()
            .is_some_and(|endstop| endstop.is_triggered());

        let outcome = self.homing.record_step(triggered, self.homing_step_limit);
        let steps_taken = self.homing.steps_taken;
        match outcome {
            HomingOutcome::Searching => MotionEvent::HomingStep { steps_taken },
            HomingOutcome::Found => {
                self.current = 0;
                self.target = 0;
                self.state = MotorState::Idle;
                MotionEvent::Homed { steps_taken }
            }
            HomingOutcome::Exhausted => {
                self.state = MotorState::Idle;
                MotionEvent::HomingAborted { steps_taken }
            }
        }
    }

    fn step(&mut self, direction: Direction) {
        self.sequencer.advance(direction, &mut self.driver);
        self.current = self.wrap(self.current, direction);
    }

    fn wrap(&self, position: u32, direction: Direction) -> u32 {
        match direction {
            Direction::Clockwise if position + 1 >= self.steps_per_rev => 0,
            Direction::Clockwise => position + 1,
            Direction::CounterClockwise if position == 0 => self.steps_per_rev - 1,
            Direction::CounterClockwise => position - 1,
        }
    }

    /// Direction of the next step toward the target, `None` when there
    ///
    /// Raw comparison, no wrap-through: a larger target is reached by
    /// stepping clockwise.
    pub fn direction(&self) -> Option<Direction> {
        if self.target > self.current {
            Some(Direction::Clockwise)
        } else if self.target < self.current {
            Some(Direction::CounterClockwise)
        } else {
            None
        }
    }

    /// Current position in half-steps
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Target position in half-steps
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Half-steps per revolution
    pub fn steps_per_rev(&self) -> u32 {
        self.steps_per_rev
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Moving or homing
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub fn is_homed(&self) -> bool {
        self.homing.homed
    }

    /// Whether a reference switch is fitted
    pub fn has_endstop(&self) -> bool {
        self.endstop.is_some()
    }

    /// Progress of the current or last homing attempt
    pub fn homing_progress(&self) -> HomingProgress {
        self.homing
    }

    /// Configured speed, 0 when stalled
    pub fn speed(&self) -> f32 {
        self.speed_steps_per_s
    }

    /// Current half-step phase
    pub fn phase(&self) -> u8 {
        self.sequencer.phase()
    }

    /// Borrow the coil driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
