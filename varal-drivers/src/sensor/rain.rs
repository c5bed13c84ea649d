//! Resistive rain sensor
//!
//! The common plate-plus-comparator module: the analog output drops as the
//! plate gets wetter, and the comparator output (D0) switches at a level set
//! by the on-board trimmer. The analog reading is inverted against full scale
//! so that larger means wetter, then classified with a threshold ladder.

use embedded_hal::digital::InputPin;
use varal_core::config::RainConfig;
use varal_core::scheduler::IntervalGate;

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read the raw ADC value (0..=adc_max)
    fn read(&mut self) -> Result<u16, SensorError>;
}

/// Sensor read error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion failed
    AdcFailed,
    /// Comparator input could not be read
    DigitalFailed,
}

/// Qualitative rain intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RainLevel {
    /// Dry plate
    #[default]
    None,
    Light,
    Moderate,
    Heavy,
}

impl RainLevel {
    /// Classify an inverted reading
    pub fn classify(inverted: u16, config: &RainConfig) -> Self {
        if inverted < config.light_threshold {
            RainLevel::None
        } else if inverted < config.moderate_threshold {
            RainLevel::Light
        } else if inverted < config.heavy_threshold {
            RainLevel::Moderate
        } else {
            RainLevel::Heavy
        }
    }

    pub fn is_raining(&self) -> bool {
        !matches!(self, RainLevel::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RainLevel::None => "NONE",
            RainLevel::Light => "LIGHT",
            RainLevel::Moderate => "MODERATE",
            RainLevel::Heavy => "HEAVY",
        }
    }
}

/// One sensor sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RainReading {
    /// Raw ADC value
    pub raw: u16,
    /// `adc_max - raw`, larger is wetter
    pub inverted: u16,
    pub level: RainLevel,
    /// Comparator says wet, `None` when no digital input is wired
    pub digital_wet: Option<bool>,
}

impl RainReading {
    pub fn is_raining(&self) -> bool {
        self.level.is_raining()
    }
}

/// Result of [`RainSensor::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RainPoll {
    /// Read interval has not elapsed
    NotDue,
    /// New sample taken
    Updated(RainReading),
    /// Read failed, previous sample kept
    Failed(SensorError),
}

/// Rain sensor with interval-gated reads
pub struct RainSensor<A, P> {
    adc: A,
    digital: Option<P>,
    config: RainConfig,
    gate: IntervalGate,
    last: RainReading,
}

impl<A: AdcReader, P: InputPin> RainSensor<A, P> {
    pub fn new(adc: A, digital: Option<P>, config: &RainConfig) -> Self {
        Self {
            adc,
            digital,
            config: *config,
            gate: IntervalGate::new(config.read_interval_us()),
            last: RainReading::default(),
        }
    }

    /// Take a sample now, ignoring the read interval
    ///
    /// Used once at boot so the first decision has real data. On error the
    /// previous reading is kept.
    pub fn read_now(&mut self) -> Result<RainReading, SensorError> {
        let raw = self.adc.read()?.min(self.config.adc_max);
        let digital_wet = match self.digital.as_mut() {
            Some(pin) => {
                let low = pin.is_low().map_err(|_| SensorError::DigitalFailed)?;
                Some(low == self.config.digital_active_low)
            }
            None => None,
        };

        let inverted = self.config.adc_max - raw;
        self.last = RainReading {
            raw,
            inverted,
            level: RainLevel::classify(inverted, &self.config),
            digital_wet,
        };
        Ok(self.last)
    }

    /// Take a sample if the read interval has elapsed
    pub fn poll(&mut self, now_us: u64) -> RainPoll {
        if !self.gate.try_take(now_us) {
            return RainPoll::NotDue;
        }
        match self.read_now() {
            Ok(reading) => RainPoll::Updated(reading),
            Err(e) => RainPoll::Failed(e),
        }
    }

    /// Last good sample
    pub fn reading(&self) -> RainReading {
        self.last
    }

    pub fn level(&self) -> RainLevel {
        self.last.level
    }

    /// Raining means any level above `None`
    pub fn is_raining(&self) -> bool {
        self.last.is_raining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Scripted ADC: returns the queued values, then errors
    struct MockAdc {
        values: &'static [Result<u16, SensorError>],
        index: usize,
    }

    impl MockAdc {
        fn new(values: &'static [Result<u16, SensorError>]) -> Self {
            Self { values, index: 0 }
        }
    }

    impl AdcReader for MockAdc {
        fn read(&mut self) -> Result<u16, SensorError> {
            let value = self
                .values
                .get(self.index)
                .copied()
                .unwrap_or(Err(SensorError::AdcFailed));
            self.index += 1;
            value
        }
    }

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

    /// Sensor with the comparator output left unwired
    fn analog_sensor(adc: MockAdc) -> RainSensor<MockAdc, MockInput> {
        RainSensor::new(adc, None, &RainConfig::default())
    }

    #[test]
    fn test_level_ladder() {
        let config = RainConfig::default();
        assert_eq!(RainLevel::classify(0, &config), RainLevel::None);
        assert_eq!(RainLevel::classify(299, &config), RainLevel::None);
        assert_eq!(RainLevel::classify(300, &config), RainLevel::Light);
        assert_eq!(RainLevel::classify(1_199, &config), RainLevel::Light);
        assert_eq!(RainLevel::classify(1_200, &config), RainLevel::Moderate);
        assert_eq!(RainLevel::classify(2_399, &config), RainLevel::Moderate);
        assert_eq!(RainLevel::classify(2_400, &config), RainLevel::Heavy);
        assert_eq!(RainLevel::classify(4_095, &config), RainLevel::Heavy);
    }

    #[test]
    fn test_dry_plate_reads_high() {
        let mut sensor = analog_sensor(MockAdc::new(&[Ok(4_000)]));
        let reading = sensor.read_now().unwrap();
        assert_eq!(reading.inverted, 95);
        assert_eq!(reading.level, RainLevel::None);
        assert!(!sensor.is_raining());
        assert_eq!(reading.digital_wet, None);
    }

    #[test]
    fn test_wet_plate_is_raining() {
        let mut sensor = analog_sensor(MockAdc::new(&[Ok(1_000)]));
        sensor.read_now().unwrap();
        assert_eq!(sensor.level(), RainLevel::Heavy);
        assert!(sensor.is_raining());
    }

    #[test]
    fn test_raw_above_full_scale_is_clamped() {
        let mut sensor = analog_sensor(MockAdc::new(&[Ok(u16::MAX)]));
        let reading = sensor.read_now().unwrap();
        assert_eq!(reading.raw, 4_095);
        assert_eq!(reading.inverted, 0);
    }

    #[test]
    fn test_poll_respects_interval() {
        let mut sensor = analog_sensor(MockAdc::new(&[Ok(4_095), Ok(100)]));
        assert_eq!(sensor.poll(999_999), RainPoll::NotDue);
        assert!(matches!(sensor.poll(1_000_000), RainPoll::Updated(_)));
        assert!(!sensor.is_raining());
        assert_eq!(sensor.poll(1_500_000), RainPoll::NotDue);
        assert!(matches!(sensor.poll(2_000_000), RainPoll::Updated(_)));
        assert!(sensor.is_raining());
    }

    #[test]
    fn test_failed_read_keeps_previous() {
        let mut sensor = analog_sensor(MockAdc::new(&[Ok(100)]));
        sensor.read_now().unwrap();
        let before = sensor.reading();

        assert_eq!(sensor.poll(1_000_000), RainPoll::Failed(SensorError::AdcFailed));
        assert_eq!(sensor.reading(), before);
        assert!(sensor.is_raining());
    }

    #[test]
    fn test_digital_active_low() {
        let mut sensor = RainSensor::new(
            MockAdc::new(&[Ok(4_095), Ok(4_095)]),
            Some(MockInput { high: false }),
            &RainConfig::default(),
        );
        assert_eq!(sensor.read_now().unwrap().digital_wet, Some(true));

        if let Some(pin) = sensor.digital.as_mut() {
            pin.high = true;
        }
        assert_eq!(sensor.read_now().unwrap().digital_wet, Some(false));
        // Digital output is diagnostic only
        assert!(!sensor.is_raining());
    }

    #[test]
    fn test_digital_active_high() {
        let config = RainConfig {
            digital_active_low: false,
            ..RainConfig::default()
        };
        let mut sensor = RainSensor::new(MockAdc::new(&[Ok(0)]), Some(MockInput { high: true }), &config);
        assert_eq!(sensor.read_now().unwrap().digital_wet, Some(true));
    }
}
