//! Gesture-driven button panel: color swatches, pen sizes, clear, and the three
//! show/hide toggles guarded by one shared cooldown.
//!
//! The controller owns every widget plus the tool and visibility state. It never
//! touches the canvas; a clear request comes back to the caller as [`UiEvent::ClearCanvas`].

use log::debug;

use crate::types::{Color, FrameBuffer};
use crate::widget::{Widget, OPAQUE, TRANSLUCENT};

/// Frames a toggle stays locked after it fires.
pub const TOGGLE_COOLDOWN_FRAMES: u32 = 10;
/// Lock at session start, so a hand already over a toggle does not fire it immediately.
pub const STARTUP_COOLDOWN_FRAMES: u32 = 20;
/// The only brush sizes the panel offers.
pub const PEN_SIZES: [i32; 4] = [5, 10, 15, 20];

/// Whiteboard backdrop opacity over the video.
const BOARD_OPACITY: f32 = 0.4;

/// Frame size the panel coordinates are written for; other sizes scale from it.
pub const LAYOUT_SIZE: (usize, usize) = (1280, 720);

/// Maps layout coordinates onto the actual frame.
#[derive(Clone, Copy, Debug)]
struct Layout {
    sx: f32,
    sy: f32,
}

impl Layout {
    fn for_frame(width: usize, height: usize) -> Self {
        Self {
            sx: width as f32 / LAYOUT_SIZE.0 as f32,
            sy: height as f32 / LAYOUT_SIZE.1 as f32,
        }
    }

    // Edges are scaled, not sizes, so neighbouring buttons stay flush.
    fn widget(&self, x: i32, y: i32, w: i32, h: i32, color: Color, label: &str) -> Widget {
        let sx = |v: i32| (v as f32 * self.sx).round() as i32;
        let sy = |v: i32| (v as f32 * self.sy).round() as i32;
        let (x0, y0) = (sx(x), sy(y));
        Widget::new(x0, y0, sx(x + w) - x0, sy(y + h) - y0, color, label)
    }
}

/// Active drawing tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolState {
    pub color: Color,
    pub brush_size: i32,
    pub eraser_size: i32,
}

impl Default for ToolState {
    fn default() -> Self {
        Self { color: Color::WHITE, brush_size: 5, eraser_size: 5 }
    }
}

impl ToolState {
    /// Black is the eraser swatch.
    pub fn is_eraser(&self) -> bool {
        self.color == Color::BLACK
    }

    /// Width the next stroke is drawn with.
    pub fn stroke_width(&self) -> i32 {
        if self.is_eraser() { self.eraser_size } else { self.brush_size }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    pub board: bool,
    pub colors: bool,
    pub sizes: bool,
}

/// Frame-count debounce shared by all toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cooldown {
    remaining: u32,
    reset_to: u32,
}

impl Cooldown {
    pub fn new(initial: u32, reset_to: u32) -> Self {
        Self { remaining: initial, reset_to }
    }

    /// Called once at the start of every frame.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    fn arm(&mut self) {
        self.remaining = self.reset_to;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    Colors,
    Sizes,
    Board,
}

/// Something the panel changed this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    ColorSelected(Color),
    BrushSizeSelected(i32),
    ClearCanvas,
    Toggled { toggle: Toggle, visible: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PenButton {
    pub widget: Widget,
    pub size: i32,
}

pub struct UiController {
    board_btn: Widget,
    colors_btn: Widget,
    size_btn: Widget,
    swatches: Vec<Widget>,
    clear_btn: Widget,
    pens: Vec<PenButton>,
    whiteboard: Widget,
    visibility: Visibility,
    tools: ToolState,
    cooldown: Cooldown,
}

impl UiController {
    /// Panel laid out for a [`LAYOUT_SIZE`] frame.
    pub fn new(tools: ToolState, cooldown: Cooldown) -> Self {
        Self::for_frame(tools, cooldown, LAYOUT_SIZE.0, LAYOUT_SIZE.1)
    }

    /// Panel scaled to a `width` x `height` frame.
    pub fn for_frame(tools: ToolState, cooldown: Cooldown, width: usize, height: usize) -> Self {
        let at = Layout::for_frame(width, height);
        let swatches = vec![
            at.widget(300, 0, 100, 100, Color::WHITE, "White"),
            at.widget(400, 0, 100, 100, Color::rgb(255, 0, 0), "Red"),
            at.widget(500, 0, 100, 100, Color::rgb(0, 0, 255), "Blue"),
            at.widget(600, 0, 100, 100, Color::rgb(0, 255, 0), "Green"),
            at.widget(700, 0, 100, 100, Color::rgb(255, 255, 0), "Yellow"),
            at.widget(800, 0, 100, 100, Color::BLACK, "Eraser"),
        ];
        let pens = PEN_SIZES
            .iter()
            .enumerate()
            .map(|(i, &size)| PenButton {
                widget: at.widget(1100, 50 + 100 * i as i32, 100, 100, Color::rgb(50, 50, 50), &size.to_string()),
                size,
            })
            .collect();

        Self {
            board_btn: at.widget(50, 0, 100, 100, Color::rgb(0, 255, 255), "Board"),
            colors_btn: at.widget(200, 0, 100, 100, Color::rgb(0, 255, 120), "Colors"),
            size_btn: at.widget(1100, 0, 100, 50, tools.color, "Size"),
            swatches,
            clear_btn: at.widget(900, 0, 100, 100, Color::rgb(100, 100, 100), "Clear"),
            pens,
            whiteboard: at.widget(50, 120, 1020, 580, Color::WHITE, "")
                .with_alpha(BOARD_OPACITY)
                .without_border(),
            visibility: Visibility::default(),
            tools,
            cooldown,
        }
    }

    pub fn tools(&self) -> ToolState {
        self.tools
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn whiteboard(&self) -> &Widget {
        &self.whiteboard
    }

    pub fn swatches(&self) -> &[Widget] {
        &self.swatches
    }

    pub fn pens(&self) -> &[PenButton] {
        &self.pens
    }

    pub fn clear_button(&self) -> &Widget {
        &self.clear_btn
    }

    pub fn toggle_button(&self, toggle: Toggle) -> &Widget {
        match toggle {
            Toggle::Colors => &self.colors_btn,
            Toggle::Sizes => &self.size_btn,
            Toggle::Board => &self.board_btn,
        }
    }

    /// Fingertip inside the whiteboard while it is shown.
    pub fn over_visible_board(&self, x: i32, y: i32) -> bool {
        self.visibility.board && self.whiteboard.is_over(x, y)
    }

    /// Advance the shared cooldown; call once per frame before any interaction.
    pub fn tick(&mut self) {
        self.cooldown.tick();
    }

    /// One navigation frame with the fingertip at (x, y).
    pub fn navigate(&mut self, x: i32, y: i32) -> Vec<UiEvent> {
        let mut events = Vec::new();

        if self.visibility.sizes {
            for pen in &mut self.pens {
                let over = pen.widget.is_over(x, y);
                pen.widget.set_pressed(over);
                if over && self.tools.brush_size != pen.size {
                    self.tools.brush_size = pen.size;
                    events.push(UiEvent::BrushSizeSelected(pen.size));
                }
            }
        }

        if self.visibility.colors {
            for swatch in &mut self.swatches {
                let over = swatch.is_over(x, y);
                swatch.set_pressed(over);
                if over && self.tools.color != swatch.color {
                    self.tools.color = swatch.color;
                    events.push(UiEvent::ColorSelected(swatch.color));
                }
            }

            let over = self.clear_btn.is_over(x, y);
            self.clear_btn.set_pressed(over);
            if over {
                events.push(UiEvent::ClearCanvas);
            }
        }

        let toggles = [
            (Toggle::Colors, &mut self.colors_btn, &mut self.visibility.colors, "Colors"),
            (Toggle::Sizes, &mut self.size_btn, &mut self.visibility.sizes, "Size"),
            (Toggle::Board, &mut self.board_btn, &mut self.visibility.board, "Board"),
        ];
        for (toggle, button, visible, idle_label) in toggles {
            if button.is_over(x, y) && self.cooldown.ready() {
                self.cooldown.arm();
                *visible = !*visible;
                button.alpha = OPAQUE;
                button.label = if *visible { "Hide" } else { idle_label }.to_string();
                events.push(UiEvent::Toggled { toggle, visible: *visible });
            } else {
                button.alpha = TRANSLUCENT;
            }
        }

        for event in &events {
            debug!("ui: {event:?}");
        }
        events
    }

    /// Whiteboard backdrop, blended onto the camera frame before compositing.
    pub fn render_backdrop(&self, frame: &mut FrameBuffer) {
        if self.visibility.board {
            self.whiteboard.render(frame);
        }
    }

    /// Every visible button, drawn over the composited frame.
    pub fn render(&mut self, frame: &mut FrameBuffer) {
        self.colors_btn.render(frame);
        self.board_btn.render(frame);

        if self.visibility.colors {
            for swatch in &self.swatches {
                swatch.render(frame);
            }
            self.clear_btn.render(frame);
        }

        self.size_btn.color = self.tools.color;
        self.size_btn.render(frame);
        if self.visibility.sizes {
            for pen in &self.pens {
                pen.widget.render(frame);
            }
        }
    }
}
