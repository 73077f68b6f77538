//! User input: the rotary encoder, its knob switch and the two push buttons.
//!
//! Input sources run on their own threads and feed `InputEvent`s into an
//! unbounded channel consumed by the panel's event loop.

mod button;
mod encoder;
#[cfg(feature = "rpi")]
mod gpio;
mod keyboard;

pub use button::*;
pub use encoder::*;
#[cfg(feature = "rpi")]
pub use gpio::*;
pub use keyboard::*;

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Encoder detents since the last event; positive is clockwise.
    Rotate(i32),
    Confirm,
    Back,
    /// The push switch in the encoder knob.
    Knob,
    /// Stop the panel (simulator only).
    Quit,
}

pub type InputSender = mpsc::UnboundedSender<InputEvent>;
pub type InputReceiver = mpsc::UnboundedReceiver<InputEvent>;

pub fn input_channel() -> (InputSender, InputReceiver) {
    mpsc::unbounded_channel()
}
