use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use euclid::{default::Size2D, size2};

const FONT: MonoFont<'static> = FONT_6X10;

pub const GLYPH_WIDTH: u32 = FONT.character_size.width;
pub const GLYPH_HEIGHT: u32 = FONT.character_size.height;
pub const TEXT_SCALE: f32 = 2.;
pub const ADVANCE: f32 = (GLYPH_WIDTH + FONT.character_spacing) as f32 * TEXT_SCALE;
pub const LINE_HEIGHT: f32 = GLYPH_HEIGHT as f32 * TEXT_SCALE;

/// RGBA buffer for a single glyph, white where lit and transparent elsewhere.
struct GlyphCanvas {
    pixels: Vec<u8>,
}

impl GlyphCanvas {
    fn new() -> Self {
        let mut pixels = Vec::with_capacity((GLYPH_WIDTH * GLYPH_HEIGHT * 4) as usize);
        for _ in 0..GLYPH_WIDTH * GLYPH_HEIGHT {
            pixels.extend_from_slice(&[255, 255, 255, 0]);
        }
        GlyphCanvas { pixels }
    }
}

impl OriginDimensions for GlyphCanvas {
    fn size(&self) -> Size {
        Size::new(GLYPH_WIDTH, GLYPH_HEIGHT)
    }
}

impl DrawTarget for GlyphCanvas {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let inside = point.x >= 0
                && point.y >= 0
                && (point.x as u32) < GLYPH_WIDTH
                && (point.y as u32) < GLYPH_HEIGHT;
            if inside && color.is_on() {
                let index = ((point.y as u32 * GLYPH_WIDTH + point.x as u32) * 4 + 3) as usize;
                self.pixels[index] = 255;
            }
        }
        Ok(())
    }
}

/// Rasterizes `c` to `GLYPH_WIDTH` by `GLYPH_HEIGHT` RGBA pixels.
pub fn rasterize(c: char) -> Vec<u8> {
    let mut canvas = GlyphCanvas::new();
    let mut buffer = [0; 4];
    let style = MonoTextStyle::new(&FONT, BinaryColor::On);
    let text = Text::with_baseline(c.encode_utf8(&mut buffer), Point::zero(), style, Baseline::Top);
    match text.draw(&mut canvas) {
        Ok(_) => {}
        Err(never) => match never {},
    }
    canvas.pixels
}

/// Printable ASCII without space, which only advances the pen.
pub fn glyphs() -> impl Iterator<Item = char> {
    '!'..='~'
}

pub fn text_size(text: &str) -> Size2D<f32> {
    size2(text.chars().count() as f32 * ADVANCE, LINE_HEIGHT)
}
