//! Rectangular on-screen buttons, swatches and the whiteboard backdrop.

use crate::draw::{blend_rect, draw_text_centered, stroke_rect};
use crate::types::{Color, FrameBuffer, Rect};

/// Fill opacity of an idle widget.
pub const TRANSLUCENT: f32 = 0.5;
/// Fill opacity of a widget under the fingertip ("pressed").
pub const OPAQUE: f32 = 1.0;

const LABEL_SCALE: i32 = 2;
const BORDER_PX: i32 = 2;

/// A plain record: geometry, fill, label and how strongly the fill covers the video.
#[derive(Clone, Debug, PartialEq)]
pub struct Widget {
    pub rect: Rect,
    pub color: Color,
    pub label: String,
    /// Opacity of `color` over the frame: 1.0 solid, 0.0 invisible.
    pub alpha: f32,
    /// Whether `render` draws the white outline.
    pub border: bool,
}

impl Widget {
    pub fn new(x: i32, y: i32, width: i32, height: i32, color: Color, label: &str) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            color,
            label: label.to_string(),
            alpha: TRANSLUCENT,
            border: true,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn without_border(mut self) -> Self {
        self.border = false;
        self
    }

    /// Strictly inside the rectangle; points on an edge do not count.
    pub fn is_over(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Pressed look when `active`, idle look otherwise.
    pub fn set_pressed(&mut self, active: bool) {
        self.alpha = if active { OPAQUE } else { TRANSLUCENT };
    }

    /// Blend the fill, center the label, outline the rectangle.
    pub fn render(&self, surface: &mut FrameBuffer) {
        blend_rect(surface, self.rect, self.color, self.alpha);
        if !self.label.is_empty() {
            draw_text_centered(surface, self.rect, &self.label, LABEL_SCALE, Color::WHITE.pack());
        }
        if self.border {
            stroke_rect(surface, self.rect, BORDER_PX, Color::WHITE.pack());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_over_excludes_edges() {
        let w = Widget::new(100, 50, 100, 100, Color::WHITE, "");
        assert!(w.is_over(101, 51));
        assert!(w.is_over(150, 100));
        assert!(w.is_over(199, 149));

        for (x, y) in [(100, 100), (200, 100), (150, 50), (150, 150), (100, 50), (200, 150)] {
            assert!(!w.is_over(x, y), "edge point ({x},{y}) counted as inside");
        }
        assert!(!w.is_over(-5, -5));
        assert!(!w.is_over(10_000, 100));
    }

    #[test]
    fn pressed_and_idle_alpha() {
        let mut w = Widget::new(0, 0, 10, 10, Color::WHITE, "x");
        w.set_pressed(true);
        assert_eq!(w.alpha, OPAQUE);
        w.set_pressed(false);
        assert_eq!(w.alpha, TRANSLUCENT);
    }

    #[test]
    fn opaque_render_paints_fill_and_border() {
        let mut frame = FrameBuffer::filled(60, 60, Color::rgb(10, 10, 10));
        let w = Widget::new(10, 10, 40, 40, Color::rgb(0, 200, 0), "").with_alpha(OPAQUE);
        w.render(&mut frame);

        assert_eq!(frame.get(30, 30), Some(Color::rgb(0, 200, 0)));
        assert_eq!(frame.get(10, 30), Some(Color::WHITE));
        assert_eq!(frame.get(5, 5), Some(Color::rgb(10, 10, 10)));
    }

    #[test]
    fn translucent_render_blends_with_video() {
        let mut frame = FrameBuffer::filled(60, 60, Color::rgb(100, 100, 100));
        let w = Widget::new(0, 0, 60, 60, Color::rgb(200, 200, 200), "").without_border();
        w.render(&mut frame);
        assert_eq!(frame.get(30, 30), Some(Color::rgb(150, 150, 150)));
    }

    #[test]
    fn label_is_drawn_inside() {
        let mut frame = FrameBuffer::new(100, 100);
        let w = Widget::new(0, 0, 100, 100, Color::BLACK, "Red").with_alpha(OPAQUE).without_border();
        w.render(&mut frame);
        let white = Color::WHITE.pack();
        let lit = frame.pixels.iter().filter(|&&p| p == white).count();
        assert!(lit > 0);
        // Corners stay untouched.
        assert_eq!(frame.get(2, 2), Some(Color::BLACK));
    }
}
