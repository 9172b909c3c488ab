// Persistent stroke layer and the mask-and-merge compositor.
// Visual expectation: strokes stay on screen across frames and fully cover the video
// where drawn; everywhere else the live camera shows through untouched.

use image::{GrayImage, Luma};

use crate::draw::draw_thick_line;
use crate::error::{Error, Result};
use crate::types::{Color, FrameBuffer, Point};

/// Canvas luma above this counts as "drawn" (tolerates faint stroke edges).
pub const MASK_THRESHOLD: u8 = 20;

/// Stroke color that means "erase".
pub const ERASER_COLOR: Color = Color::BLACK;
/// What the canvas holds where nothing is drawn.
pub const BACKGROUND: Color = Color::BLACK;

/// Every intermediate buffer of one composite, for the diagnostics window.
pub struct CompositeStages {
    /// Canvas converted to luma.
    pub gray: GrayImage,
    /// 0 where drawn, 255 where blank.
    pub mask: GrayImage,
    /// Camera frame with drawn regions blacked out.
    pub masked: FrameBuffer,
    /// `masked` OR canvas: what the user sees.
    pub output: FrameBuffer,
}

pub struct DrawingCanvas {
    buffer: FrameBuffer,
    eraser_size: i32,
}

impl DrawingCanvas {
    /// All-zero canvas matching the video resolution.
    pub fn new(width: usize, height: usize, eraser_size: i32) -> Self {
        Self { buffer: FrameBuffer::new(width, height), eraser_size }
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn eraser_size(&self) -> i32 {
        self.eraser_size
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.is_blank()
    }

    /// Rasterize one stroke segment. The eraser color paints background at eraser width.
    pub fn draw_segment(&mut self, from: Point, to: Point, color: Color, width: i32) {
        let (color, width) = if color == ERASER_COLOR {
            (BACKGROUND, self.eraser_size)
        } else {
            (color, width)
        };
        draw_thick_line(&mut self.buffer, from, to, width.max(1), color.pack());
    }

    /// Back to all-zero (nothing drawn).
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn check_size(&self, camera: &FrameBuffer) -> Result<()> {
        if !self.buffer.same_size(camera) {
            return Err(Error::FrameSize {
                expected: (self.buffer.width, self.buffer.height),
                actual: (camera.width, camera.height),
            });
        }
        Ok(())
    }

    /// Overlay the strokes on `camera`: drawn pixels replace the video, blank pixels keep it.
    pub fn composite(&self, camera: &FrameBuffer) -> Result<FrameBuffer> {
        self.check_size(camera)?;
        let pixels = camera
            .pixels
            .iter()
            .zip(&self.buffer.pixels)
            .map(|(&cam, &ink)| (cam & mask_word(ink)) | ink)
            .collect();
        Ok(FrameBuffer { width: camera.width, height: camera.height, pixels })
    }

    /// Same result as [`composite`](Self::composite), keeping each step.
    pub fn composite_stages(&self, camera: &FrameBuffer) -> Result<CompositeStages> {
        self.check_size(camera)?;
        let (w, h) = (self.buffer.width, self.buffer.height);

        // 1) Canvas -> single channel intensity
        let gray = GrayImage::from_fn(w as u32, h as u32, |x, y| {
            Luma([Color::unpack(self.buffer.pixels[y as usize * w + x as usize]).luma()])
        });

        // 2) Inverse binary threshold: drawn -> 0, blank -> 255
        let mut mask = gray.clone();
        for p in mask.pixels_mut() {
            p[0] = if p[0] > MASK_THRESHOLD { 0 } else { 255 };
        }

        // 3) Black out the drawn regions of the camera frame
        let masked_pixels = camera
            .pixels
            .iter()
            .zip(mask.as_raw())
            .map(|(&cam, &m)| cam & expand_mask(m))
            .collect();
        let masked = FrameBuffer { width: w, height: h, pixels: masked_pixels };

        // 4) OR the strokes into the holes
        let output_pixels = masked
            .pixels
            .iter()
            .zip(&self.buffer.pixels)
            .map(|(&m, &ink)| m | ink)
            .collect();
        let output = FrameBuffer { width: w, height: h, pixels: output_pixels };

        Ok(CompositeStages { gray, mask, masked, output })
    }
}

/// Per-pixel AND mask: keep the camera pixel only where the canvas is blank.
#[inline]
fn mask_word(ink: u32) -> u32 {
    let drawn = Color::unpack(ink).luma() > MASK_THRESHOLD;
    expand_mask(if drawn { 0 } else { 255 })
}

#[inline]
fn expand_mask(m: u8) -> u32 {
    Color::rgb(m, m, m).pack()
}
