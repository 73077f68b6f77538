//! Polls the encoder and buttons through `rppal` on a dedicated thread.

use super::{Debouncer, InputEvent, InputSender, QuadratureDecoder};
use crate::config::{
    BUTTON_BACK_PIN, BUTTON_CONFIRM_PIN, BUTTON_KNOB_PIN, ENCODER_PIN_A, ENCODER_PIN_B,
};
use crate::error::{AppError, Result};
use rppal::gpio::{Gpio, InputPin};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

struct Button {
    pin: InputPin,
    debouncer: Debouncer,
    event: InputEvent,
}

/// Claims the input pins (with pull-ups) and starts the polling thread.
pub fn spawn_gpio_input(tx: InputSender) -> Result<JoinHandle<()>> {
    let gpio = Gpio::new()?;
    let enc_a = gpio.get(ENCODER_PIN_A)?.into_input_pullup();
    let enc_b = gpio.get(ENCODER_PIN_B)?.into_input_pullup();
    let mut buttons = [
        (BUTTON_CONFIRM_PIN, InputEvent::Confirm),
        (BUTTON_BACK_PIN, InputEvent::Back),
        (BUTTON_KNOB_PIN, InputEvent::Knob),
    ]
    .into_iter()
    .map(|(pin, event)| {
        Ok(Button {
            pin: gpio.get(pin)?.into_input_pullup(),
            debouncer: Debouncer::default(),
            event,
        })
    })
    .collect::<Result<Vec<_>>>()?;

    info!(
        "GPIO input: encoder {}/{}, confirm {}, back {}, knob {}",
        ENCODER_PIN_A, ENCODER_PIN_B, BUTTON_CONFIRM_PIN, BUTTON_BACK_PIN, BUTTON_KNOB_PIN
    );

    thread::Builder::new()
        .name("gpio-input".to_string())
        .spawn(move || {
            let mut decoder = QuadratureDecoder::new();
            loop {
                let step = decoder.update(enc_a.is_high(), enc_b.is_high());
                if step != 0 && tx.send(InputEvent::Rotate(step)).is_err() {
                    debug!("Input receiver dropped, stopping GPIO poller");
                    return;
                }

                let now = Instant::now();
                for button in buttons.iter_mut() {
                    // Active low: pressed pulls the line to ground
                    if button.debouncer.update(button.pin.is_low(), now)
                        && tx.send(button.event).is_err()
                    {
                        return;
                    }
                }

                thread::sleep(POLL_INTERVAL);
            }
        })
        .map_err(|e| AppError::Hardware(format!("cannot start GPIO thread: {}", e)))
}
