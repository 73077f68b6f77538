//! The OLED: framebuffer, drawing helpers, transitions and output devices.

pub mod frame;
mod ssd1306;
mod terminal;
pub mod transition;

pub use frame::{cut_corner_box, Font, Frame, HEIGHT, WIDTH};
pub use ssd1306::*;
pub use terminal::*;
pub use transition::FramePlan;

use crate::error::Result;

/// Something that can show a full frame: the SSD1306 or its terminal stand-in.
pub trait Panel: Send {
    fn show(&mut self, frame: &Frame) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}
