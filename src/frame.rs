//! Frame buffers the overlay renderer draws on.
//!
//! - `Canvas`: drawing primitives the renderer needs (rectangle, circle, text, resize).
//! - `Frame`: RGB raster backed by `image::RgbImage`, with a built-in 5x7 bitmap font.
//! - `RecordingCanvas`: records draw calls instead of rasterizing them.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::geometry::Point;

pub type Color = Rgb<u8>;

/// Horizontal advance of one glyph, in pixels.
const GLYPH_ADVANCE: i32 = 6;
const GLYPH_ROWS: i32 = 7;

/// Mutable 2-D pixel buffer with the primitives used by the overlay renderer.
///
/// Coordinates may fall outside the buffer; implementations clip.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Outline of the axis-aligned box spanned by two opposite corners.
    fn draw_rectangle(&mut self, pt1: Point, pt2: Point, color: Color);

    /// Outline of a circle.
    fn draw_circle(&mut self, center: Point, radius: i32, color: Color);

    /// Text whose bottom-left corner sits at `origin`.
    fn put_text(&mut self, origin: Point, text: &str, color: Color);

    /// Replace the buffer contents with a resampled copy of the given size.
    fn resize(&mut self, width: u32, height: u32);
}

// ----------------------------------------------------------------------------
// Frame: RGB raster
// ----------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    /// Black frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.image.width() as i32 || y >= self.image.height() as i32 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }
}

impl Canvas for Frame {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn draw_rectangle(&mut self, pt1: Point, pt2: Point, color: Color) {
        let (left, right) = (pt1.0.min(pt2.0), pt1.0.max(pt2.0));
        let (top, bottom) = (pt1.1.min(pt2.1), pt1.1.max(pt2.1));
        // Edges outside the image only need their visible span walked.
        let (w, h) = (self.image.width() as i32, self.image.height() as i32);
        for x in left.max(0)..=right.min(w - 1) {
            self.plot(x, top, color);
            self.plot(x, bottom, color);
        }
        for y in top.max(0)..=bottom.min(h - 1) {
            self.plot(left, y, color);
            self.plot(right, y, color);
        }
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: Color) {
        let (cx, cy) = center;
        let mut x = radius.max(0);
        let mut y = 0;
        let mut err = 1 - x;
        while x >= y {
            for (dx, dy) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.plot(cx.saturating_add(dx), cy.saturating_add(dy), color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    fn put_text(&mut self, origin: Point, text: &str, color: Color) {
        let (mut x, baseline) = origin;
        let top = baseline.saturating_sub(GLYPH_ROWS - 1);
        for ch in text.chars().flat_map(|c| c.to_uppercase()) {
            if let Some(glyph) = glyph_bits(ch) {
                for (row, pattern) in glyph.iter().enumerate() {
                    for col in 0..5 {
                        if (pattern >> (4 - col)) & 1 == 1 {
                            self.plot(x.saturating_add(col), top.saturating_add(row as i32), color);
                        }
                    }
                }
            }
            x = x.saturating_add(GLYPH_ADVANCE);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() == (width, height) {
            return;
        }
        self.image = imageops::resize(&self.image, width, height, FilterType::Triangle);
    }
}

fn glyph_bits(ch: char) -> Option<[u8; 7]> {
    let bits = match ch {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '%' => [0b10001, 0b10010, 0b00100, 0b01000, 0b10010, 0b10001, 0b00000],
        '.' => [0, 0, 0, 0, 0, 0b00110, 0b00110],
        ':' => [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        '_' => [0, 0, 0, 0, 0, 0, 0b11111],
        '/' => [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000],
        ' ' => [0; 7],
        _ => return None,
    };
    Some(bits)
}

// ----------------------------------------------------------------------------
// RecordingCanvas: draw calls as data
// ----------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Rectangle {
        pt1: Point,
        pt2: Point,
        color: Color,
    },
    Circle {
        center: Point,
        radius: i32,
        color: Color,
    },
    Text {
        origin: Point,
        text: String,
        color: Color,
    },
    Resize {
        width: u32,
        height: u32,
    },
}

/// Canvas that keeps an ordered list of draw calls.
///
/// Used for headless runs where the overlay is shipped as vector data.
#[derive(Clone, Debug)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text strings drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_rectangle(&mut self, pt1: Point, pt2: Point, color: Color) {
        self.commands
            .push(DrawCommand::Rectangle { pt1, pt2, color });
    }

    fn draw_circle(&mut self, center: Point, radius: i32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn put_text(&mut self, origin: Point, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
            color,
        });
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(DrawCommand::Resize { width, height });
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
