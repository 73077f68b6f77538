//! Terminal stand-in for the OLED, used with `--simulate`.
//!
//! Two pixel rows share one character cell using Unicode half blocks.

use super::frame::{Frame, HEIGHT, WIDTH};
use super::Panel;
use crate::error::Result;
use colored::Colorize;
use console::Term;

/// Characters for (top, bottom) pixel pairs.
fn cell(top: bool, bottom: bool) -> char {
    match (top, bottom) {
        (true, true) => '█',
        (true, false) => '▀',
        (false, true) => '▄',
        (false, false) => ' ',
    }
}

/// Renders `frame` into `HEIGHT / 2` lines of `WIDTH` characters, without colour.
pub fn render_lines(frame: &Frame) -> Vec<String> {
    (0..HEIGHT / 2)
        .map(|row| {
            (0..WIDTH)
                .map(|x| cell(frame.pixel(x, row * 2), frame.pixel(x, row * 2 + 1)))
                .collect()
        })
        .collect()
}

/// The bordered, cyan text block for one frame.
pub fn render_text(frame: &Frame) -> String {
    let border = "─".repeat(WIDTH as usize);
    let mut text = format!("┌{}┐\n", border);
    for line in render_lines(frame) {
        text.push_str(&format!("│{}│\n", line.cyan()));
    }
    text.push_str(&format!("└{}┘\n", border));
    text
}

pub struct TerminalPanel {
    term: Term,
}

impl TerminalPanel {
    pub fn stdout() -> Self {
        Self {
            term: Term::buffered_stdout(),
        }
    }
}

impl Panel for TerminalPanel {
    fn show(&mut self, frame: &Frame) -> Result<()> {
        // Each frame overwrites the previous one from the top-left corner
        self.term.move_cursor_to(0, 0)?;
        self.term.write_str(&render_text(frame))?;
        self.term.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.term.clear_screen()?;
        self.term.flush()?;
        Ok(())
    }
}
