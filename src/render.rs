//! Frame renderer: turns the current message into one RGB frame.
//!
//! Rendering is total. Whatever string is in the shared cell, the call
//! produces a frame: text that does not fit is clipped by the draw target's
//! bounds check, an empty string leaves the background untouched, and
//! degenerate dimensions are clamped to one pixel. No I/O happens here;
//! the only synchronization is the single snapshot of the shared message.

use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};

use crate::state::SharedMessage;

pub const DEFAULT_WIDTH: u32 = 512;
pub const DEFAULT_HEIGHT: u32 = 512;

const CHANNELS: usize = 3;

/// One rendered frame: a `height × width × 3` RGB grid with every channel
/// normalized to `[0, 1]`, plus a leading single-frame time axis in the
/// reported shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub height: u32,
    pub width: u32,
    data: Vec<f32>,
}

impl Frame {
    /// Shape as `[time, height, width, channel]`.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, CHANNELS]
    }

    /// Flat channel data in row-major `[y][x][c]` order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// RGB triple at pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Owned RGB byte grid that embedded-graphics primitives draw into.
/// Out-of-bounds pixels are dropped, so clipped text cannot fail a draw.
struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * CHANNELS],
        }
    }

    fn into_frame(self) -> Frame {
        Frame {
            height: self.height,
            width: self.width,
            data: self.pixels.iter().map(|&b| b as f32 / 255.0).collect(),
        }
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
                continue;
            }
            let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
            self.pixels[offset] = color.r();
            self.pixels[offset + 1] = color.g();
            self.pixels[offset + 2] = color.b();
        }
        Ok(())
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Draw `text` centered in a `width × height` frame, white on black.
pub fn render_text(text: &str, width: u32, height: u32) -> Frame {
    let width = width.max(1);
    let height = height.max(1);
    let mut buffer = FrameBuffer::new(width, height);

    let character_style = MonoTextStyle::new(&FONT_10X20, Rgb888::WHITE);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let center = Point::new(width as i32 / 2, height as i32 / 2);
    Text::with_text_style(text, center, character_style, text_style)
        .draw(&mut buffer)
        .ok();

    buffer.into_frame()
}

/// The render side of the bridge: reads the shared message exactly once
/// per call and produces one frame from that snapshot.
#[derive(Clone)]
pub struct Renderer {
    message: SharedMessage,
}

impl Renderer {
    pub fn new(message: SharedMessage) -> Self {
        Self { message }
    }

    /// Produce one frame of the requested size (512×512 when unspecified).
    pub fn render(&self, width: Option<u32>, height: Option<u32>) -> Frame {
        // Single snapshot: a concurrent update landing mid-render must not
        // make two reads disagree within one frame.
        let text = self.message.snapshot();
        render_text(
            &text,
            width.unwrap_or(DEFAULT_WIDTH),
            height.unwrap_or(DEFAULT_HEIGHT),
        )
    }
}
