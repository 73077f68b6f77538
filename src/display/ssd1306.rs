//! SSD1306 128x64 OLED driver over I2C.
//!
//! The bus is abstracted behind `I2cBus` so the command stream can be checked
//! without hardware; `rppal` provides the real bus behind the `rpi` feature.

use super::frame::{Frame, WIDTH};
use super::Panel;
use crate::error::Result;
use tracing::{debug, info};

/// Control byte announcing a command stream.
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte announcing display RAM data.
const CONTROL_DATA: u8 = 0x40;
/// Data bytes per I2C write (plus the control byte).
const DATA_CHUNK: usize = 32;

/// Power-up sequence for a 128x64 module with the internal charge pump.
const INIT_SEQUENCE: &[u8] = &[
    0xAE, // display off
    0xD5, 0x80, // clock divide
    0xA8, 0x3F, // multiplex 64
    0xD3, 0x00, // display offset
    0x40, // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1, // segment remap
    0xC8, // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4, // follow RAM
    0xA6, // normal (not inverted)
    0xAF, // display on
];

/// Minimal write-only I2C transport bound to the display's address.
pub trait I2cBus: Send {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

pub struct Ssd1306<B: I2cBus> {
    bus: B,
}

impl<B: I2cBus> Ssd1306<B> {
    /// Wraps the bus and runs the initialisation sequence.
    pub fn new(bus: B) -> Result<Self> {
        let mut display = Self { bus };
        display.command(INIT_SEQUENCE)?;
        info!("SSD1306 initialised");
        Ok(display)
    }

    fn command(&mut self, cmds: &[u8]) -> Result<()> {
        let mut buf = Vec::with_capacity(cmds.len() + 1);
        buf.push(CONTROL_COMMAND);
        buf.extend_from_slice(cmds);
        self.bus.write(&buf)
    }

    fn write_pages(&mut self, pages: &[u8]) -> Result<()> {
        // Reset the RAM window to the full panel before streaming data
        self.command(&[0x21, 0, (WIDTH - 1) as u8, 0x22, 0, 7])?;
        for chunk in pages.chunks(DATA_CHUNK) {
            let mut buf = Vec::with_capacity(chunk.len() + 1);
            buf.push(CONTROL_DATA);
            buf.extend_from_slice(chunk);
            self.bus.write(&buf)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub fn into_bus(self) -> B {
        self.bus
    }
}

impl<B: I2cBus> Panel for Ssd1306<B> {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        self.write_pages(frame.as_pages())
    }

    fn clear(&mut self) -> Result<()> {
        debug!("Clearing SSD1306");
        self.write_pages(Frame::new().as_pages())
    }
}

#[cfg(feature = "rpi")]
mod rpi {
    use super::I2cBus;
    use crate::error::{AppError, Result};
    use rppal::i2c::I2c;

    /// `rppal` I2C bus 1 (GPIO 2/3 on the Pi header).
    pub struct RppalI2c {
        i2c: I2c,
    }

    impl RppalI2c {
        pub fn open(address: u16) -> Result<Self> {
            let mut i2c = I2c::new()?;
            i2c.set_slave_address(address)?;
            Ok(Self { i2c })
        }
    }

    impl I2cBus for RppalI2c {
        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            let written = self.i2c.write(bytes)?;
            if written != bytes.len() {
                return Err(AppError::Hardware(format!(
                    "short I2C write: {} of {} bytes",
                    written,
                    bytes.len()
                )));
            }
            Ok(())
        }
    }
}

#[cfg(feature = "rpi")]
pub use rpi::RppalI2c;
