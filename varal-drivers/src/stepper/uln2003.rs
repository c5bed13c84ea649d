//! ULN2003 stepper output
//!
//! Four GPIOs drive the darlington inputs IN1..IN4 of a ULN2003 board,
//! which sinks the coil current of a unipolar stepper such as the 28BYJ-48.

use core::convert::Infallible;

use embedded_hal::digital::{OutputPin, PinState};
use varal_core::traits::{CoilDriver, CoilPattern};

/// Four-coil output stage
pub struct Uln2003<P> {
    pins: [P; 4],
    /// Last pattern written
    pattern: CoilPattern,
}

impl<P: OutputPin<Error = Infallible>> Uln2003<P> {
    /// Take ownership of IN1..IN4 and switch all coils off
    pub fn new(pins: [P; 4]) -> Self {
        let mut driver = Self {
            pins,
            pattern: [false; 4],
        };
        driver.release();
        driver
    }

    /// De-energize all coils (no holding torque)
    pub fn release(&mut self) {
        self.energize([false; 4]);
    }

    /// Pattern currently on the outputs
    pub fn pattern(&self) -> CoilPattern {
        self.pattern
    }
}

impl<P: OutputPin<Error = Infallible>> CoilDriver for Uln2003<P> {
    fn energize(&mut self, pattern: CoilPattern) {
        for (pin, &on) in self.pins.iter_mut().zip(pattern.iter()) {
            pin.set_state(PinState::from(on)).unwrap_or_else(|e| match e {});
        }
        self.pattern = pattern;
    }
}
