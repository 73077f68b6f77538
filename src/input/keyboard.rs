//! Keyboard stand-in for the knob and buttons, used with `--simulate`.

use super::{InputEvent, InputSender};
use console::{Key, Term};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Maps a key press to a panel input.
///
/// Arrows or `a`/`d` rotate, Enter confirms, Backspace/Escape go back,
/// Space presses the knob and `q` quits.
pub fn map_key(key: &Key) -> Option<InputEvent> {
    match key {
        Key::ArrowLeft | Key::ArrowUp | Key::Char('a') => Some(InputEvent::Rotate(-1)),
        Key::ArrowRight | Key::ArrowDown | Key::Char('d') => Some(InputEvent::Rotate(1)),
        Key::Enter => Some(InputEvent::Confirm),
        Key::Backspace | Key::Escape => Some(InputEvent::Back),
        Key::Char(' ') => Some(InputEvent::Knob),
        Key::Char('q') => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Reads keys on a blocking thread until the terminal closes or the receiver is dropped.
pub fn spawn_keyboard_input(tx: InputSender) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let term = Term::stdout();
        loop {
            let key = match term.read_key() {
                Ok(key) => key,
                Err(e) => {
                    warn!("Keyboard input stopped: {}", e);
                    let _ = tx.send(InputEvent::Quit);
                    return;
                },
            };
            let Some(event) = map_key(&key) else {
                continue;
            };
            debug!("Key {:?} -> {:?}", key, event);
            let quit = event == InputEvent::Quit;
            if tx.send(event).is_err() || quit {
                return;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(&Key::ArrowRight), Some(InputEvent::Rotate(1)));
        assert_eq!(map_key(&Key::Char('a')), Some(InputEvent::Rotate(-1)));
        assert_eq!(map_key(&Key::Enter), Some(InputEvent::Confirm));
        assert_eq!(map_key(&Key::Escape), Some(InputEvent::Back));
        assert_eq!(map_key(&Key::Char(' ')), Some(InputEvent::Knob));
        assert_eq!(map_key(&Key::Char('q')), Some(InputEvent::Quit));
        assert_eq!(map_key(&Key::Char('x')), None);
    }
}
