//! Control loop task
//!
//! One cooperative loop drives everything in a fixed order: pending mode
//! command, rain sensor, then motion and decision. Each component gates
//! itself on the loop's monotonic time, so a cycle never does more than one
//! unit of work per component.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use varal_core::control::{Action, Decision, DoorCommand, OperatingMode};
use varal_core::scheduler::{millis_to_micros, IntervalGate};
use varal_core::state::MotionEvent;
use varal_drivers::sensor::{RainPoll, RainReading};

use crate::channels::MODE_CMD;
use crate::components::{BoardRainSensor, BoardSystem};

/// Loop cadence, well below the step interval at full speed
const LOOP_INTERVAL_US: u64 = 250;

/// Status heartbeat interval
const STATUS_INTERVAL_MS: u32 = 30_000;

#[embassy_executor::task]
pub async fn control_task(mut system: BoardSystem, mut rain: BoardRainSensor) {
    info!("Control task started");

    match rain.read_now() {
        Ok(reading) => log_reading(&reading),
        Err(e) => warn!("Initial rain read failed: {:?}", e),
    }

    if system.start_homing() {
        info!("Homing started");
    } else {
        info!("No end-stop fitted, boot position taken as zero");
    }

    let mut ticker = Ticker::every(Duration::from_micros(LOOP_INTERVAL_US));
    let mut status_gate = IntervalGate::new(millis_to_micros(STATUS_INTERVAL_MS));

    loop {
        ticker.next().await;
        let now_us = Instant::now().as_micros();

        if let Some(mode) = MODE_CMD.try_take() {
            info!("Mode set to {}", mode.as_str());
            system.set_mode(mode);
        }

        match rain.poll(now_us) {
            RainPoll::NotDue => {}
            RainPoll::Updated(reading) => log_reading(&reading),
            RainPoll::Failed(e) => warn!("Rain read failed, keeping last reading: {:?}", e),
        }

        let raining = rain.is_raining();
        let report = system.tick(now_us, raining);
        log_motion(report.motion);
        log_decision(report.decision, system.mode(), raining);

        if status_gate.try_take(now_us) {
            let status = system.status();
            info!(
                "Status: mode={} door={} motor={} homed={} pos={}/{} rain={}",
                status.mode.as_str(),
                status.door.as_str(),
                status.motor.as_str(),
                status.homed,
                status.current,
                status.target,
                rain.level().as_str()
            );
        }
    }
}

fn log_reading(reading: &RainReading) {
    debug!(
        "Rain: analog={} inverted={} digital_wet={} level={}",
        reading.raw,
        reading.inverted,
        reading.digital_wet,
        reading.level.as_str()
    );
}

fn log_motion(event: MotionEvent) {
    match event {
        MotionEvent::Idle | MotionEvent::Waiting => {}
        MotionEvent::Stepped { position } => trace!("Step -> {}", position),
        MotionEvent::HomingStep { steps_taken } => trace!("Homing step {}", steps_taken),
        MotionEvent::Arrived { position } => info!("Target reached at step {}", position),
        MotionEvent::Homed { steps_taken } => {
            info!("Homing OK after {} steps, zero set", steps_taken)
        }
        MotionEvent::HomingAborted { steps_taken } => {
            warn!(
                "Homing failed: no end-stop after {} steps, automatic operation halted",
                steps_taken
            )
        }
    }
}

fn log_decision(decision: Decision, mode: OperatingMode, raining: bool) {
    if decision.seeded {
        info!("Initial door state assumed CLOSED");
    }

    match decision.action {
        Action::NotDue | Action::MotorBusy | Action::Satisfied(_) => {}
        Action::AwaitingHoming => info!("Awaiting homing..."),
        Action::Command(command) => {
            let verb = match command {
                DoorCommand::Open => "opening",
                DoorCommand::Close => "closing",
            };
            match mode {
                OperatingMode::Auto => {
                    info!("AUTO: {} -> {}", if raining { "raining" } else { "dry" }, verb)
                }
                forced => info!("{}: {} (rain ignored)", forced.as_str(), verb),
            }
        }
    }
}
