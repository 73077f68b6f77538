//! The 128x64 monochrome framebuffer and the drawing helpers every screen uses.
//!
//! Pixels are stored in SSD1306 page order (8 pages of 128 column bytes, LSB = top row)
//! so a frame can be pushed to the panel without repacking.

use embedded_graphics::mono_font::{iso_8859_1, MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Ellipse, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle,
};
use embedded_graphics::text::{Baseline, Text};
use std::convert::Infallible;

pub const WIDTH: i32 = 128;
pub const HEIGHT: i32 = 64;
pub const BUFFER_LEN: usize = (WIDTH * HEIGHT / 8) as usize;

/// Bitmap fonts available to screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// 5x8: menu lists, text screens and dashboard captions.
    Small,
    /// 6x10: dashboard date box.
    Medium,
    /// 10x20: dashboard clock digits.
    Large,
    /// 9x18 bold: the weather temperature.
    Temperature,
}

impl Font {
    pub fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Small => &iso_8859_1::FONT_5X8,
            Font::Medium => &iso_8859_1::FONT_6X10,
            Font::Large => &iso_8859_1::FONT_10X20,
            Font::Temperature => &iso_8859_1::FONT_9X18_BOLD,
        }
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(self, text: &str) -> i32 {
        let font = self.mono();
        let n = text.chars().count() as i32;
        if n == 0 {
            return 0;
        }
        let advance = (font.character_size.width + font.character_spacing) as i32;
        n * advance - font.character_spacing as i32
    }

    pub fn line_height(self) -> i32 {
        self.mono().character_size.height as i32
    }
}

fn color(on: bool) -> BinaryColor {
    if on {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; BUFFER_LEN],
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Frame({} lit)", self.lit_count())
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    /// A blank (all off) frame.
    pub fn new() -> Self {
        Self {
            buf: [0; BUFFER_LEN],
        }
    }

    fn in_bounds(x: i32, y: i32) -> bool {
        (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y)
    }

    /// Reads a pixel; anything outside the frame is off.
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if !Self::in_bounds(x, y) {
            return false;
        }
        let idx = (y / 8 * WIDTH + x) as usize;
        self.buf[idx] & (1 << (y % 8)) != 0
    }

    /// Writes a pixel; writes outside the frame are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if !Self::in_bounds(x, y) {
            return;
        }
        let idx = (y / 8 * WIDTH + x) as usize;
        let bit = 1 << (y % 8);
        if on {
            self.buf[idx] |= bit;
        } else {
            self.buf[idx] &= !bit;
        }
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> usize {
        self.buf.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Page-major bytes as expected by SSD1306 horizontal addressing.
    pub fn as_pages(&self) -> &[u8] {
        &self.buf
    }

    /// Copies `src` shifted by `(dx, dy)`, replacing the covered area. Parts that fall
    /// outside the frame are clipped.
    pub fn paste(&mut self, src: &Frame, dx: i32, dy: i32) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let (tx, ty) = (x + dx, y + dy);
                if Self::in_bounds(tx, ty) {
                    self.set_pixel(tx, ty, src.pixel(x, y));
                }
            }
        }
    }

    /// Copies whole rows of `src` for which `keep_row(y)` is true.
    pub fn paste_rows<F>(&mut self, src: &Frame, keep_row: F)
    where
        F: Fn(i32) -> bool,
    {
        for y in (0..HEIGHT).filter(|y| keep_row(*y)) {
            for x in 0..WIDTH {
                self.set_pixel(x, y, src.pixel(x, y));
            }
        }
    }

    // --- Drawing helpers (corners are inclusive) ---

    /// Draws `text` with its top-left corner at `(x, y)`. `on = false` draws dark
    /// glyphs, used on top of filled bars.
    pub fn text(&mut self, x: i32, y: i32, text: &str, font: Font, on: bool) {
        let style = MonoTextStyle::new(font.mono(), color(on));
        let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(self);
    }

    /// Draws `text` horizontally centred on the frame.
    pub fn text_centered(&mut self, y: i32, text: &str, font: Font, on: bool) {
        let x = (WIDTH - font.text_width(text)) / 2;
        self.text(x, y, text, font, on);
    }

    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) {
        let _ = Rectangle::with_corners(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_fill(color(on)))
            .draw(self);
    }

    /// Outline in white with an optional fill inside.
    pub fn outline_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, fill: Option<bool>) {
        let mut builder = PrimitiveStyleBuilder::new()
            .stroke_color(BinaryColor::On)
            .stroke_width(1);
        if let Some(f) = fill {
            builder = builder.fill_color(color(f));
        }
        let _ = Rectangle::with_corners(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(builder.build())
            .draw(self);
    }

    /// One-pixel rectangle outline in the given colour, interior untouched.
    pub fn stroke_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) {
        let _ = Rectangle::with_corners(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(color(on), 1))
            .draw(self);
    }

    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, on: bool) {
        let _ = Line::new(Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(color(on), 1))
            .draw(self);
    }

    /// Ellipse inscribed in the box `(x1, y1)-(x2, y2)`.
    pub fn ellipse(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, filled: bool) {
        let size = Size::new((x2 - x1 + 1).max(1) as u32, (y2 - y1 + 1).max(1) as u32);
        let style = if filled {
            PrimitiveStyle::with_fill(BinaryColor::On)
        } else {
            PrimitiveStyle::with_stroke(BinaryColor::On, 1)
        };
        let _ = Ellipse::new(Point::new(x1, y1), size)
            .into_styled(style)
            .draw(self);
    }

    /// Filled triangle. Other filled shapes are built from these.
    pub fn fill_triangle(&mut self, p1: (i32, i32), p2: (i32, i32), p3: (i32, i32), on: bool) {
        let _ = Triangle::new(
            Point::new(p1.0, p1.1),
            Point::new(p2.0, p2.1),
            Point::new(p3.0, p3.1),
        )
        .into_styled(PrimitiveStyle::with_fill(color(on)))
        .draw(self);
    }

    /// Text lines from the top-left, 10px apart, at most six of them.
    pub fn text_lines(&mut self, lines: &[String], centered: bool) {
        for (i, line) in lines.iter().take(6).enumerate() {
            let y = i as i32 * 10;
            if centered {
                self.text_centered(y, line, Font::Small, true);
            } else {
                self.text(0, y, line, Font::Small, true);
            }
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Frame {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, c) in pixels {
            self.set_pixel(point.x, point.y, c.is_on());
        }
        Ok(())
    }
}

/// Box with a slanted, filled title tab in its top-left corner.
pub fn cut_corner_box(frame: &mut Frame, x1: i32, y1: i32, x2: i32, y2: i32, title: &str) {
    frame.outline_rect(x1, y1, x2, y2, Some(false));
    // Slanted tab: the quad (x1,y1) (x1+24,y1) (x1+20,y1+8) (x1,y1+8) as two triangles
    let corner_w = 24;
    frame.fill_triangle((x1, y1), (x1 + corner_w, y1), (x1 + corner_w - 4, y1 + 8), true);
    frame.fill_triangle((x1, y1), (x1 + corner_w - 4, y1 + 8), (x1, y1 + 8), true);
    frame.text(x1 + 3, y1, title, Font::Small, false);
}
