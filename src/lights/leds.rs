//! The four activity LEDs.

use crate::error::Result;
use tracing::{debug, info};

/// A row of on/off LEDs addressed by index.
pub trait LedBank: Send {
    fn set(&mut self, index: usize, on: bool) -> Result<()>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn all_off(&mut self) -> Result<()> {
        for i in 0..self.len() {
            self.set(i, false)?;
        }
        Ok(())
    }
}

/// Simulated LEDs that only log their state changes.
#[derive(Debug, Clone)]
pub struct LogLeds {
    states: Vec<bool>,
}

impl LogLeds {
    pub fn new(count: usize) -> Self {
        info!("Simulating {} LEDs", count);
        Self {
            states: vec![false; count],
        }
    }

    pub fn states(&self) -> &[bool] {
        &self.states
    }
}

impl LedBank for LogLeds {
    fn set(&mut self, index: usize, on: bool) -> Result<()> {
        if let Some(state) = self.states.get_mut(index) {
            if *state != on {
                debug!("LED {} {}", index, if on { "on" } else { "off" });
                *state = on;
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.states.len()
    }
}

#[cfg(feature = "rpi")]
mod gpio {
    use super::LedBank;
    use crate::error::Result;
    use rppal::gpio::{Gpio, OutputPin};
    use tracing::info;

    /// LEDs on BCM output pins, driven high for on.
    pub struct GpioLeds {
        pins: Vec<OutputPin>,
    }

    impl GpioLeds {
        pub fn open(pins: &[u8]) -> Result<Self> {
            let gpio = Gpio::new()?;
            let pins = pins
                .iter()
                .map(|&p| Ok(gpio.get(p)?.into_output_low()))
                .collect::<Result<Vec<_>>>()?;
            info!("Driving {} LEDs over GPIO", pins.len());
            Ok(Self { pins })
        }
    }

    impl LedBank for GpioLeds {
        fn set(&mut self, index: usize, on: bool) -> Result<()> {
            if let Some(pin) = self.pins.get_mut(index) {
                if on {
                    pin.set_high();
                } else {
                    pin.set_low();
                }
            }
            Ok(())
        }

        fn len(&self) -> usize {
            self.pins.len()
        }
    }
}

#[cfg(feature = "rpi")]
pub use gpio::GpioLeds;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_leds_track_state() {
        let mut leds = LogLeds::new(4);
        leds.set(1, true).unwrap();
        leds.set(9, true).unwrap();
        assert_eq!(leds.states(), &[false, true, false, false]);
        leds.all_off().unwrap();
        assert!(leds.states().iter().all(|s| !s));
        assert!(!leds.is_empty());
    }
}
