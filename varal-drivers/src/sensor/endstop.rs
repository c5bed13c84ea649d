//! Mechanical end-stop switch
//!
//! Usually wired between the input and ground with the internal pull-up
//! enabled, so the input reads low when the switch is closed.

use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use varal_core::traits::Endstop;

/// End-stop on a digital input
pub struct EndstopSwitch<P> {
    pin: P,
    /// Triggered when the input is low
    active_low: bool,
}

impl<P: InputPin<Error = Infallible>> EndstopSwitch<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }
}

impl<P: InputPin<Error = Infallible>> Endstop for EndstopSwitch<P> {
    fn is_triggered(&mut self) -> bool {
        let low = self.pin.is_low().unwrap_or_else(|e| match e {});
        low == self.active_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    struct MockInput {
        high: bool,
    }

    impl ErrorType for MockInput {
        type Error = Infallible;
    }

    impl InputPin for MockInput {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_active_low() {
        let mut switch = EndstopSwitch::new(MockInput { high: true }, true);
        assert!(!switch.is_triggered());
        switch.pin.high = false;
        assert!(switch.is_triggered());
    }

    #[test]
    fn test_active_high() {
        let mut switch = EndstopSwitch::new(MockInput { high: true }, false);
        assert!(switch.is_triggered());
        switch.pin.high = false;
        assert!(!switch.is_triggered());
    }
}
