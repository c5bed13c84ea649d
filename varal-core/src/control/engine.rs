//! Door decision engine
//!
//! Runs on its own cadence, independent of the step rate. On each decision
//! tick it waits for an idle, homed motor, then compares the desired door
//! state (from mode and rain) with the last commanded one and issues a
//! command only when they differ.

use crate::config::DecisionConfig;
use crate::control::mode::OperatingMode;
use crate::scheduler::IntervalGate;
use crate::state::{DoorState, MotorState};

/// Motor status as seen by the engine at the start of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorSnapshot {
    pub state: MotorState,
    pub homed: bool,
}

/// Motion the engine wants performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoorCommand {
    /// Move to the open angle
    Open,
    /// Move to the closed angle
    Close,
}

impl DoorCommand {
    /// Door state once the command has been carried out
    pub fn resulting_state(&self) -> DoorState {
        match self {
            DoorCommand::Open => DoorState::Open,
            DoorCommand::Close => DoorState::Closed,
        }
    }
}

/// What the engine did on one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Decision interval has not elapsed
    NotDue,
    /// Motor is moving or homing, decision skipped
    MotorBusy,
    /// No absolute zero yet, decision skipped
    AwaitingHoming,
    /// Door already in the desired state
    Satisfied(DoorState),
    /// Door must move
    Command(DoorCommand),
}

/// Outcome of one engine call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Decision {
    /// The unknown door state was assumed closed on this tick
    pub seeded: bool,
    pub action: Action,
}

impl Decision {
    const fn skipped(action: Action) -> Self {
        Self {
            seeded: false,
            action,
        }
    }

    /// Door command issued on this tick, if any
    pub fn command(&self) -> Option<DoorCommand> {
        match self.action {
            Action::Command(command) => Some(command),
            _ => None,
        }
    }
}

/// Turns mode and rain into door commands
#[derive(Debug, Clone, Copy)]
pub struct VaralDecisionEngine {
    gate: IntervalGate,
    mode: OperatingMode,
    door: DoorState,
    closed_angle_deg: f32,
    open_angle_deg: f32,
}

impl VaralDecisionEngine {
    /// Create an engine in `Auto` mode with the door state unknown
    pub fn new(config: &DecisionConfig) -> Self {
        Self {
            gate: IntervalGate::new(config.decision_interval_us()),
            mode: OperatingMode::Auto,
            door: DoorState::Unknown,
            closed_angle_deg: config.closed_angle_deg,
            open_angle_deg: config.open_angle_deg,
        }
    }

    /// Change the operating mode; applied on the next decision tick
    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Last commanded door state
    pub fn door(&self) -> DoorState {
        self.door
    }

    /// Motor angle for a door command
    pub fn angle_for(&self, command: DoorCommand) -> f32 {
        match command {
            DoorCommand::Open => self.open_angle_deg,
            DoorCommand::Close => self.closed_angle_deg,
        }
    }

    /// Door state the current mode asks for
    pub fn desired_door(&self, raining: bool) -> DoorState {
        match self.mode {
            OperatingMode::Auto if raining => DoorState::Closed,
            OperatingMode::Auto => DoorState::Open,
            OperatingMode::ForceOpen => DoorState::Open,
            OperatingMode::ForceClose => DoorState::Closed,
        }
    }

    /// Run one decision if the interval has elapsed
    ///
    /// The door state is updated as soon as a command is issued. Since no
    /// decision is taken while the motor is busy, the next decision always
    /// sees the move finished.
    pub fn tick(&mut self, now_us: u64, motor: MotorSnapshot, raining: bool) -> Decision {
        if !self.gate.try_take(now_us) {
            return Decision::skipped(Action::NotDue);
        }
        if motor.state.is_busy() {
            return Decision::skipped(Action::MotorBusy);
        }
        if !motor.homed {
            return Decision::skipped(Action::AwaitingHoming);
        }

        let seeded = !self.door.is_known();
        if seeded {
            self.door = DoorState::Closed;
        }

        let desired = self.desired_door(raining);
        let action = if self.door == desired {
            Action::Satisfied(desired)
        } else {
            let command = match desired {
                DoorState::Open => DoorCommand::Open,
                _ => DoorCommand::Close,
            };
            self.door = command.resulting_state();
            Action::Command(command)
        };

        Decision { seeded, action }
    }
}
