//! Concrete hardware types for this board

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::{Input, Output};

use varal_core::VaralSystem;
use varal_drivers::sensor::{AdcReader, EndstopSwitch, RainSensor, SensorError};
use varal_drivers::stepper::Uln2003;

/// ULN2003 inputs IN1..IN4
pub type CoilOutputs = Uln2003<Output<'static>>;

/// Motor and decision engine wired to this board
pub type BoardSystem = VaralSystem<CoilOutputs, EndstopSwitch<Input<'static>>>;

/// Rain sensor with analog and comparator outputs
pub type BoardRainSensor = RainSensor<RainAdc, Input<'static>>;

/// Blocking ADC channel feeding the rain sensor
pub struct RainAdc {
    adc: Adc<'static, Blocking>,
    channel: Channel<'static>,
}

impl RainAdc {
    pub fn new(adc: Adc<'static, Blocking>, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for RainAdc {
    fn read(&mut self) -> Result<u16, SensorError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| SensorError::AdcFailed)
    }
}
