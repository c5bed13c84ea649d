//! State definitions
//!
//! Exactly one [`MotorState`] and one [`DoorState`] are active at a time.

/// What the stepper is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// No motion pending
    #[default]
    Idle,
    /// Stepping toward a target position
    Moving,
    /// Searching for the reference switch
    Homing,
}

impl MotorState {
    /// Check if the motor is busy (moving or homing)
    pub fn is_busy(&self) -> bool {
        !matches!(self, MotorState::Idle)
    }

    /// Status string for telemetry
    pub fn as_str(&self) -> &'static str {
        match self {
            MotorState::Idle => "IDLE",
            MotorState::Moving => "MOVING",
            MotorState::Homing => "HOMING",
        }
    }
}

/// Physical state of the clothesline as last commanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoorState {
    /// Not known yet; only before the first successful homing
    #[default]
    Unknown,
    /// Retracted (rest position)
    Closed,
    /// Extended for drying
    Open,
}

impl DoorState {
    /// Check if the door position is known
    pub fn is_known(&self) -> bool {
        !matches!(self, DoorState::Unknown)
    }

    /// Status string for telemetry
    pub fn as_str(&self) -> &'static str {
        match self {
            DoorState::Unknown => "UNKNOWN",
            DoorState::Closed => "CLOSED",
            DoorState::Open => "OPEN",
        }
    }
}
