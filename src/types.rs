// Core value types shared by the canvas, the widgets and the window.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An RGB color. Packed into frame pixels as 0x00RRGGBB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as 0x00RRGGBB (the layout minifb expects).
    #[inline]
    pub const fn pack(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub const fn unpack(px: u32) -> Self {
        Self {
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }

    /// Luma with the BT.601 weights, rounded to the nearest integer.
    #[inline]
    pub fn luma(self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

/// A pixel position in frame space (origin top-left, x right, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; position and size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Strict containment: points exactly on an edge are outside.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x < x && x < self.x + self.width && self.y < y && y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// All-zero (black) buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::BLACK)
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self { width, height, pixels: vec![color.pack(); width * height] }
    }

    /// Color at (x,y), or None when outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(Color::unpack(self.pixels[y as usize * self.width + x as usize]))
    }

    pub fn same_size(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Pack interleaved RGB bytes (row-major, 3 per pixel) into 0x00RRGGBB pixels.
    pub fn from_rgb_bytes(width: usize, height: usize, rgb: &[u8]) -> Result<Self> {
        if rgb.len() != width * height * 3 {
            return Err(Error::FrameSize { expected: (width, height), actual: (rgb.len() / 3, 1) });
        }
        let pixels = rgb
            .chunks_exact(3)
            .map(|p| Color::rgb(p[0], p[1], p[2]).pack())
            .collect();
        Ok(Self { width, height, pixels })
    }

    /// Expand a single-channel image to gray pixels (used to show masks in a window).
    pub fn from_gray_image(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let pixels = img.pixels().map(|p| Color::rgb(p[0], p[0], p[0]).pack()).collect();
        Self { width: w as usize, height: h as usize, pixels }
    }

    /// Raw interleaved RGB bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let c = Color::unpack(px);
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
        out
    }

    /// Flip left/right in place (selfie view).
    pub fn mirror_horizontal(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// True when no pixel differs from zero.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&p| p == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_matches_minifb_layout() {
        let c = Color::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.pack(), 0x0012_3456);
        assert_eq!(Color::unpack(0x00AB_CDEF), Color::rgb(0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn luma_uses_bt601_weights() {
        assert_eq!(Color::WHITE.luma(), 255);
        assert_eq!(Color::BLACK.luma(), 0);
        assert_eq!(Color::rgb(255, 0, 0).luma(), 76);
        assert_eq!(Color::rgb(0, 0, 255).luma(), 29);
    }

    #[test]
    fn mirror_reverses_each_row() {
        let mut fb = FrameBuffer { width: 3, height: 2, pixels: vec![1, 2, 3, 4, 5, 6] };
        fb.mirror_horizontal();
        assert_eq!(fb.pixels, vec![3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn rgb_image_round_trips_through_bytes() {
        let img = image::RgbImage::from_fn(4, 2, |x, y| image::Rgb([x as u8, y as u8, 7]));
        let fb = FrameBuffer::from_rgb_bytes(4, 2, img.as_raw()).unwrap();
        assert_eq!(fb.get(3, 1), Some(Color::rgb(3, 1, 7)));
        assert_eq!(fb.to_rgb_bytes(), img.into_raw());
    }

    #[test]
    fn short_rgb_payload_is_rejected() {
        assert!(matches!(FrameBuffer::from_rgb_bytes(4, 2, &[0; 23]), Err(Error::FrameSize { .. })));
    }
}
