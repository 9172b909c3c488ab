// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composited board.
// 2) Lines, discs and rectangles for strokes, buttons and the hand skeleton.
// 3) A tiny 5x7 bitmap font to render button labels on top of the video.

use crate::error::Error;
use crate::types::{Color, FrameBuffer, Point, Rect};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image (live video).
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// True while ESC or Q is held down (we exit when either is pressed).
    pub fn quit_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape) || self.window.is_key_down(Key::Q)
    }

    // cycles the diagnostics window to the next pipeline stage.
    pub fn tab_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::Tab, KeyRepeat::No)
    }
}

/* ---------- Software drawing: pixels, lines, discs, rectangles ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
pub fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Walk the Bresenham line from `a` to `b`, calling `plot` for every point (endpoints included).
fn bresenham(a: Point, b: Point, mut plot: impl FnMut(i32, i32)) {
    let (mut x0, mut y0, x1, y1) = (a.x, a.y, b.x, b.y);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        plot(x0, y0);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Draw a thin line between `a` and `b`.
/// Visual: a straight 1-pixel line appears on top of the camera image.
pub fn draw_line(fb: &mut FrameBuffer, a: Point, b: Point, color: u32) {
    bresenham(a, b, |x, y| put_pixel(fb, x, y, color));
}

/// Filled disc of the given radius; radius 0 is a single pixel.
pub fn fill_circle(fb: &mut FrameBuffer, center: Point, radius: i32, color: u32) {
    let r = radius.max(0);
    let r2 = r as i64 * r as i64 + r as i64; // slightly rounder edge than r*r for small radii
    for dy in -r..=r {
        for dx in -r..=r {
            if (dx as i64).pow(2) + (dy as i64).pow(2) <= r2 {
                put_pixel(fb, center.x + dx, center.y + dy, color);
            }
        }
    }
}

/// Line `width` pixels thick with round caps: a disc stamped at every Bresenham step.
/// Visual: a solid stroke, no gaps even for fast fingertip motion.
pub fn draw_thick_line(fb: &mut FrameBuffer, a: Point, b: Point, width: i32, color: u32) {
    if width <= 1 {
        draw_line(fb, a, b, color);
        return;
    }
    let radius = width / 2;
    bresenham(a, b, |x, y| fill_circle(fb, Point::new(x, y), radius, color));
}

/// Mix `color` into the rectangle: `opacity` 1.0 paints it solid, 0.0 leaves the frame as is.
/// The rectangle is clipped to the frame.
pub fn blend_rect(fb: &mut FrameBuffer, rect: Rect, color: Color, opacity: f32) {
    let a = opacity.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    let x0 = rect.x.max(0) as usize;
    let y0 = rect.y.max(0) as usize;
    let x1 = (rect.x + rect.width).clamp(0, fb.width as i32) as usize;
    let y1 = (rect.y + rect.height).clamp(0, fb.height as i32) as usize;
    let mix = |fg: u8, bg: u8| (a * fg as f32 + inv * bg as f32).round().clamp(0.0, 255.0) as u8;

    for y in y0..y1 {
        let row = y * fb.width;
        for x in x0..x1 {
            let bg = Color::unpack(fb.pixels[row + x]);
            fb.pixels[row + x] =
                Color::rgb(mix(color.r, bg.r), mix(color.g, bg.g), mix(color.b, bg.b)).pack();
        }
    }
}

/// Rectangle outline `thickness` pixels wide, drawn inward from the rectangle edge.
pub fn stroke_rect(fb: &mut FrameBuffer, rect: Rect, thickness: i32, color: u32) {
    for t in 0..thickness.max(1) {
        let (l, r) = (rect.x + t, rect.x + rect.width - 1 - t);
        let (top, bottom) = (rect.y + t, rect.y + rect.height - 1 - t);
        if l > r || top > bottom {
            break;
        }
        draw_line(fb, Point::new(l, top), Point::new(r, top), color);
        draw_line(fb, Point::new(l, bottom), Point::new(r, bottom), color);
        draw_line(fb, Point::new(l, top), Point::new(l, bottom), color);
        draw_line(fb, Point::new(r, top), Point::new(r, bottom), color);
    }
}

/* ---------- 5x7 bitmap font (uppercase, digits and a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters share the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation: space, vertical bar, colon, dot, dash
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Width and height in pixels of `text` drawn at `scale`.
pub fn text_size(text: &str, scale: i32) -> (i32, i32) {
    let n = text.chars().count() as i32;
    if n == 0 {
        return (0, 0);
    }
    // 5 pixels per glyph + 1 pixel spacing, no trailing space
    ((6 * n - 1) * scale, 7 * scale)
}

fn draw_glyph_cells(fb: &mut FrameBuffer, x: i32, y: i32, rows: &[u8; 7], scale: i32, color: u32) {
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    put_pixel(fb, x + rx * scale + sx, y + ry as i32 * scale + sy, color);
                }
            }
        }
    }
}

/// Draw a single 5x7 character at (x,y), each font pixel a `scale` x `scale` block.
/// Visual: a glyph appears with a black shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        // Shadow pass: offset by one font pixel in black to improve readability
        draw_glyph_cells(fb, x + scale.max(1) / 2 + 1, y + scale.max(1) / 2 + 1, &rows, scale, 0x0000_0000);
        // Foreground pass: actual glyph in chosen color
        draw_glyph_cells(fb, x, y, &rows, scale, color);
    }
}

/// Draw a text string using 5x7 glyphs at `scale`.
/// Visual: each glyph is 5x7 font pixels with 1 font pixel of spacing.
pub fn draw_text(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: u32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, scale, color);
        x += 6 * scale;
    }
}

/// Draw `text` centered in `rect`.
pub fn draw_text_centered(fb: &mut FrameBuffer, rect: Rect, text: &str, scale: i32, color: u32) {
    let (tw, th) = text_size(text, scale.max(1));
    let c = rect.center();
    draw_text(fb, c.x - tw / 2, c.y - th / 2, text, scale, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_line_hits_both_endpoints() {
        let mut fb = FrameBuffer::new(20, 20);
        draw_line(&mut fb, Point::new(2, 3), Point::new(15, 9), 0xFF);
        assert_eq!(fb.pixels[3 * 20 + 2], 0xFF);
        assert_eq!(fb.pixels[9 * 20 + 15], 0xFF);
    }

    #[test]
    fn thick_line_covers_its_width() {
        let mut fb = FrameBuffer::new(40, 40);
        draw_thick_line(&mut fb, Point::new(5, 20), Point::new(30, 20), 5, 0xFF);
        for y in 18..=22 {
            assert_eq!(fb.get(15, y), Some(Color::rgb(0, 0, 0xFF)), "row {y}");
        }
        assert_eq!(fb.get(15, 24), Some(Color::BLACK));
    }

    #[test]
    fn drawing_off_frame_is_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        draw_thick_line(&mut fb, Point::new(-50, -50), Point::new(-5, 60), 9, 0xFF);
        fill_circle(&mut fb, Point::new(500, 5), 3, 0xFF);
        blend_rect(&mut fb, Rect::new(8, 8, 100, 100), Color::WHITE, 1.0);
        assert_eq!(fb.get(9, 9), Some(Color::WHITE));
        assert_eq!(fb.get(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn blend_rect_mixes_by_opacity() {
        let mut fb = FrameBuffer::filled(4, 4, Color::rgb(100, 100, 100));
        blend_rect(&mut fb, Rect::new(0, 0, 2, 4), Color::rgb(200, 0, 100), 0.5);
        assert_eq!(fb.get(1, 1), Some(Color::rgb(150, 50, 100)));
        assert_eq!(fb.get(2, 1), Some(Color::rgb(100, 100, 100)));
    }

    #[test]
    fn stroke_rect_leaves_interior_alone() {
        let mut fb = FrameBuffer::new(10, 10);
        stroke_rect(&mut fb, Rect::new(0, 0, 10, 10), 2, 0xFFFFFF);
        assert_eq!(fb.get(0, 5), Some(Color::WHITE));
        assert_eq!(fb.get(1, 5), Some(Color::WHITE));
        assert_eq!(fb.get(2, 5), Some(Color::BLACK));
        assert_eq!(fb.get(9, 9), Some(Color::WHITE));
    }

    #[test]
    fn labels_have_glyphs() {
        for label in ["Colors", "Hide", "Size", "Board", "White", "Red", "Blue", "Green", "Yellow", "Eraser", "Clear", "5", "10", "15", "20"] {
            assert!(label.chars().all(|c| glyph5x7(c).is_some()), "missing glyph in {label}");
        }
        assert_eq!(text_size("Size", 2), (46, 14));
    }
}
