//! Control-loop aggregate
//!
//! [`VaralSystem`] owns the position controller and the decision engine and
//! calls them in a fixed order once per cycle. The motor state handed to the
//! engine is the one from the start of the cycle, so a decision never reacts
//! to the step taken in the same call.

use crate::config::VaralConfig;
use crate::control::{Decision, MotorSnapshot, OperatingMode, VaralDecisionEngine};
use crate::motion::PositionController;
use crate::state::{DoorState, MotionEvent, MotorState};
use crate::traits::{CoilDriver, Endstop, NoEndstop};

/// Everything that happened during one [`VaralSystem::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    pub motion: MotionEvent,
    pub decision: Decision,
}

/// Read-only status for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VaralStatus {
    pub mode: OperatingMode,
    pub door: DoorState,
    pub motor: MotorState,
    pub homed: bool,
    pub busy: bool,
    /// Position in half-steps
    pub current: u32,
    /// Target in half-steps
    pub target: u32,
}

/// Motor plus decision engine for one clothesline
pub struct VaralSystem<D, E = NoEndstop> {
    motor: PositionController<D, E>,
    engine: VaralDecisionEngine,
}

impl<D: CoilDriver, E: Endstop> VaralSystem<D, E> {
    /// Build the system; homing is not started automatically
    pub fn new(driver: D, endstop: Option<E>, config: &VaralConfig) -> Self {
        Self {
            motor: PositionController::new(driver, endstop, &config.motor),
            engine: VaralDecisionEngine::new(&config.varal),
        }
    }

    /// Begin homing, `false` if no reference switch is fitted
    pub fn start_homing(&mut self) -> bool {
        self.motor.start_homing()
    }

    /// Run one control cycle: motion, then decision
    pub fn tick(&mut self, now_us: u64, raining: bool) -> TickReport {
        let snapshot = MotorSnapshot {
            state: self.motor.state(),
            homed: self.motor.is_homed(),
        };

        let motion = self.motor.tick(now_us);
        let decision = self.engine.tick(now_us, snapshot, raining);

        if let Some(command) = decision.command() {
            self.motor.set_target_angle(self.engine.angle_for(command));
        }

        TickReport { motion, decision }
    }

    /// Set the operating mode (last write before a decision tick wins)
    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.engine.set_mode(mode);
    }

    pub fn mode(&self) -> OperatingMode {
        self.engine.mode()
    }

    pub fn is_busy(&self) -> bool {
        self.motor.is_busy()
    }

    pub fn is_homed(&self) -> bool {
        self.motor.is_homed()
    }

    pub fn motor(&self) -> &PositionController<D, E> {
        &self.motor
    }

    /// Snapshot for status reporting
    pub fn status(&self) -> VaralStatus {
        VaralStatus {
            mode: self.engine.mode(),
            door: self.engine.door(),
            motor: self.motor.state(),
            homed: self.motor.is_homed(),
            busy: self.motor.is_busy(),
            current: self.motor.current(),
            target: self.motor.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{Action, DoorCommand};
    use crate::testing::{fast_motor, MockCoils, MockEndstop};

    const DECISION_US: u64 = 2_000_000;

    fn config() -> VaralConfig {
        VaralConfig {
            motor: fast_motor(),
            ..VaralConfig::default()
        }
    }

    fn run_until_idle<E: Endstop>(sys: &mut VaralSystem<MockCoils, E>, now: &mut u64, raining: bool) {
        for _ in 0..100_000 {
            *now += 1;
            sys.tick(*now, raining);
            if !sys.is_busy() {
                return;
            }
        }
        panic!("system never went idle");
    }

    #[test]
    fn test_dry_boot_opens() {
        let mut sys: VaralSystem<MockCoils> = VaralSystem::new(MockCoils::default(), None, &config());
        assert!(sys.is_homed());

        let report = sys.tick(DECISION_US, false);
        assert!(report.decision.seeded);
        assert_eq!(report.decision.action, Action::Command(DoorCommand::Open));
        // Motion for the command starts on the next cycle
        assert_eq!(report.motion, MotionEvent::Idle);
        assert_eq!(sys.status().target, 3072);
        assert_eq!(sys.status().motor, MotorState::Moving);

        let mut now = DECISION_US;
        run_until_idle(&mut sys, &mut now, false);
        let status = sys.status();
        assert_eq!(status.current, 3072);
        assert_eq!(status.door, DoorState::Open);
    }

    #[test]
    fn test_rain_closes_and_stays_closed() {
        let mut sys: VaralSystem<MockCoils> = VaralSystem::new(MockCoils::default(), None, &config());
        let mut now = DECISION_US;
        sys.tick(now, false);
        run_until_idle(&mut sys, &mut now, false);

        now = 2 * DECISION_US;
        let report = sys.tick(now, true);
        assert_eq!(report.decision.command(), Some(DoorCommand::Close));
        run_until_idle(&mut sys, &mut now, true);
        assert_eq!(sys.status().current, 0);

        let writes = sys.motor().driver().writes;
        for i in 3..8 {
            let report = sys.tick(i * DECISION_US, true);
            assert_eq!(report.decision.command(), None);
        }
        assert_eq!(sys.motor().driver().writes, writes);
    }

    #[test]
    fn test_decision_skipped_while_moving() {
        let mut sys: VaralSystem<MockCoils> = VaralSystem::new(MockCoils::default(), None, &config());
        sys.tick(DECISION_US, false);
        sys.set_mode(OperatingMode::ForceClose);

        // Still thousands of steps away from the open angle
        let report = sys.tick(2 * DECISION_US, false);
        assert_eq!(report.decision.action, Action::MotorBusy);
        assert_eq!(sys.status().target, 3072);
    }

    #[test]
    fn test_engine_sees_start_of_cycle_state() {
        let mut sys: VaralSystem<MockCoils> = VaralSystem::new(MockCoils::default(), None, &config());
        sys.tick(DECISION_US, false);
        sys.set_mode(OperatingMode::ForceClose);

        let mut now = DECISION_US;
        // Stop one step short of the open angle
        for _ in 0..3071 {
            now += 1;
            sys.tick(now, false);
        }
        assert_eq!(sys.status().current, 3071);

        // This cycle arrives, but the decision still sees a moving motor
        let report = sys.tick(2 * DECISION_US, false);
        assert_eq!(report.motion, MotionEvent::Arrived { position: 3072 });
        assert_eq!(report.decision.action, Action::MotorBusy);

        let report = sys.tick(3 * DECISION_US, false);
        assert_eq!(report.decision.command(), Some(DoorCommand::Close));
    }

    #[test]
    fn test_homing_before_decisions() {
        let mut sys = VaralSystem::new(MockCoils::default(), Some(MockEndstop::after(100)), &config());
        assert!(!sys.is_homed());
        assert_eq!(sys.tick(DECISION_US, false).decision.action, Action::AwaitingHoming);

        assert!(sys.start_homing());
        let mut now = DECISION_US;
        run_until_idle(&mut sys, &mut now, false);
        assert!(sys.is_homed());
        assert_eq!(sys.status().door, DoorState::Unknown);

        let report = sys.tick(2 * DECISION_US, false);
        assert!(report.decision.seeded);
        assert_eq!(report.decision.command(), Some(DoorCommand::Open));
    }

    #[test]
    fn test_failed_homing_blocks_automatic_operation() {
        let mut sys = VaralSystem::new(MockCoils::default(), Some(MockEndstop::never()), &config());
        sys.start_homing();
        let mut now = 0;
        run_until_idle(&mut sys, &mut now, false);
        assert!(!sys.is_homed());

        for i in 1..5 {
            let report = sys.tick(now + i * DECISION_US, true);
            assert_eq!(report.decision.action, Action::AwaitingHoming);
        }
        assert_eq!(sys.status().door, DoorState::Unknown);
    }

    #[test]
    fn test_status_reports_mode() {
        let mut sys: VaralSystem<MockCoils> = VaralSystem::new(MockCoils::default(), None, &config());
        sys.set_mode(OperatingMode::ForceOpen);
        let status = sys.status();
        assert_eq!(status.mode, OperatingMode::ForceOpen);
        assert!(status.homed);
        assert!(!status.busy);
        assert_eq!(status.mode.as_str(), "FORCE_OPEN");
    }
}
