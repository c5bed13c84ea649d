//! Varal - Motorized Clothesline Firmware
//!
//! Main firmware binary for RP2040-based boards. Drives a 28BYJ-48 stepper
//! through a ULN2003 board, homes against an end-stop, and opens or closes
//! the line depending on a rain sensor and remote mode commands.
//!
//! Board wiring:
//! - GPIO2..GPIO5: ULN2003 IN1..IN4
//! - GPIO6: end-stop to ground (internal pull-up)
//! - GPIO7: rain sensor comparator output (D0)
//! - GPIO26 / ADC0: rain sensor analog output (A0)
//! - GPIO0 / GPIO1: UART0 TX/RX to the network bridge

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use varal_core::VaralSystem;
use varal_drivers::sensor::{EndstopSwitch, RainSensor};
use varal_drivers::stepper::Uln2003;

use crate::components::RainAdc;

mod channels;
mod components;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Varal firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    info!(
        "Motor: {} steps/rev, {} steps/s, homing {} within {} revs",
        config.motor.steps_per_rev,
        config.motor.speed_steps_per_s,
        config.motor.homing_direction,
        config.motor.homing_revolutions
    );
    info!(
        "Angles: closed={} open={}, decision every {} ms",
        config.varal.closed_angle_deg,
        config.varal.open_angle_deg,
        config.varal.decision_interval_ms
    );

    // Stepper outputs, all coils off until the controller energizes phase 0
    let coils = Uln2003::new([
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
    ]);

    let endstop = if config.motor.has_endstop {
        let pin = Input::new(p.PIN_6, Pull::Up);
        Some(EndstopSwitch::new(pin, config.motor.endstop_active_low))
    } else {
        info!("No end-stop configured");
        None
    };

    let system = VaralSystem::new(coils, endstop, &config);
    info!("Stepper initialized");

    // Rain sensor: analog plate on ADC0, comparator on GPIO7
    let adc = Adc::new_blocking(p.ADC, embassy_rp::adc::Config::default());
    let rain_channel = Channel::new_pin(p.PIN_26, Pull::None);
    let rain_digital = Input::new(p.PIN_7, Pull::None);
    let rain = RainSensor::new(
        RainAdc::new(adc, rain_channel),
        Some(rain_digital),
        &config.rain,
    );
    info!("Rain sensor initialized");

    // Command link (115200 baud default)
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (_tx, rx) = uart.split();
    info!("UART initialized for commands");

    unwrap!(spawner.spawn(tasks::control_task(system, rain)));
    unwrap!(spawner.spawn(tasks::command_rx_task(rx)));

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
