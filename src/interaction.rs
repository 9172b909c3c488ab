//! Per-frame orchestration: finger state + fingertip -> gesture -> panel or canvas,
//! then compositing and widget overlay.
//!
//! The gesture is recomputed from scratch every frame. The only memory carried between
//! frames is the stroke cursor here and the cooldown inside the [`UiController`].

use log::debug;

use crate::canvas::{CompositeStages, DrawingCanvas};
use crate::draw::{draw_line, fill_circle};
use crate::error::Result;
use crate::fingers::{classify, FingerState, ThumbRule};
use crate::landmarks::{HandLandmarks, HAND_CONNECTIONS};
use crate::types::{Color, FrameBuffer, Point};
use crate::ui::{UiController, UiEvent};

const SKELETON_COLOR: Color = Color::rgb(0, 255, 0);
const JOINT_COLOR: Color = Color::rgb(255, 0, 0);

/// What the hand is doing this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// No hand, or index finger down.
    None,
    /// Index up, middle down, fingertip over the visible board.
    Navigate(Point),
    /// Index and middle up over the visible board.
    Draw(Point),
    /// Index up with the fingertip outside the visible board; behaves like `Navigate`.
    Outside(Point),
}

/// Pure mapping from this frame's fingers and fingertip to a gesture.
pub fn classify_gesture(fingers: Option<FingerState>, tip: Point, ui: &UiController) -> Gesture {
    let Some(fingers) = fingers else {
        return Gesture::None;
    };
    if !fingers.index {
        return Gesture::None;
    }
    if !ui.over_visible_board(tip.x, tip.y) {
        return Gesture::Outside(tip);
    }
    if fingers.middle { Gesture::Draw(tip) } else { Gesture::Navigate(tip) }
}

/// Overlay options that do not change interaction semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Draw the detected hand skeleton.
    pub show_landmarks: bool,
    /// Show a disc of the brush size under the fingertip while drawing.
    pub brush_preview: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self { show_landmarks: true, brush_preview: true }
    }
}

pub struct InteractionLoop {
    ui: UiController,
    canvas: DrawingCanvas,
    /// Last fingertip while the draw gesture is held.
    cursor: Option<Point>,
    thumb_rule: ThumbRule,
    overlay: OverlayOptions,
    last_gesture: Gesture,
    fingers: Option<FingerState>,
}

impl InteractionLoop {
    pub fn new(ui: UiController, canvas: DrawingCanvas, thumb_rule: ThumbRule, overlay: OverlayOptions) -> Self {
        Self {
            ui,
            canvas,
            cursor: None,
            thumb_rule,
            overlay,
            last_gesture: Gesture::None,
            fingers: None,
        }
    }

    pub fn ui(&self) -> &UiController {
        &self.ui
    }

    pub fn canvas(&self) -> &DrawingCanvas {
        &self.canvas
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Finger state of the most recent frame; `None` when no hand was seen.
    pub fn fingers(&self) -> Option<FingerState> {
        self.fingers
    }

    /// Apply one frame's gesture to the panel or the canvas.
    pub fn apply(&mut self, gesture: Gesture) -> Vec<UiEvent> {
        if std::mem::discriminant(&gesture) != std::mem::discriminant(&self.last_gesture) {
            debug!("gesture: {gesture:?}");
        }
        self.last_gesture = gesture;

        match gesture {
            Gesture::None => {
                self.cursor = None;
                Vec::new()
            }
            Gesture::Navigate(tip) | Gesture::Outside(tip) => {
                self.cursor = None;
                let events = self.ui.navigate(tip.x, tip.y);
                if events.contains(&UiEvent::ClearCanvas) {
                    self.canvas.clear();
                }
                events
            }
            Gesture::Draw(tip) => {
                // First sample of a stroke only seeds the cursor.
                if let Some(prev) = self.cursor {
                    let tools = self.ui.tools();
                    self.canvas.draw_segment(prev, tip, tools.color, tools.stroke_width());
                }
                self.cursor = Some(tip);
                Vec::new()
            }
        }
    }

    /// Run one full frame: classify, interact, composite, overlay widgets.
    pub fn process_frame(&mut self, camera: &FrameBuffer, hand: Option<&HandLandmarks>) -> Result<FrameBuffer> {
        self.ui.tick();

        let fingers = classify(hand, self.thumb_rule);
        self.fingers = fingers;
        let tip = hand.map(HandLandmarks::fingertip).unwrap_or_default();
        let gesture = classify_gesture(fingers, tip, &self.ui);
        self.apply(gesture);

        let mut frame = camera.clone();
        if let (Some(hand), true) = (hand, self.overlay.show_landmarks) {
            draw_skeleton(&mut frame, hand);
        }
        if let (Gesture::Draw(tip), true) = (gesture, self.overlay.brush_preview) {
            let tools = self.ui.tools();
            fill_circle(&mut frame, tip, tools.stroke_width(), tools.color.pack());
        }

        let mut out = if self.ui.visibility().board {
            self.ui.render_backdrop(&mut frame);
            self.canvas.composite(&frame)?
        } else {
            frame
        };
        self.ui.render(&mut out);
        Ok(out)
    }

    /// Intermediate compositing buffers for `camera`, for the diagnostics window.
    pub fn composite_stages(&self, camera: &FrameBuffer) -> Result<CompositeStages> {
        self.canvas.composite_stages(camera)
    }
}

fn draw_skeleton(frame: &mut FrameBuffer, hand: &HandLandmarks) {
    for (a, b) in HAND_CONNECTIONS {
        draw_line(frame, hand.point(a), hand.point(b), SKELETON_COLOR.pack());
    }
    for p in hand.points {
        fill_circle(frame, p, 2, JOINT_COLOR.pack());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Cooldown, ToolState, TOGGLE_COOLDOWN_FRAMES};

    const RED: Color = Color::rgb(255, 0, 0);

    fn fingers(index: bool, middle: bool) -> Option<FingerState> {
        Some(FingerState { index, middle, ..FingerState::default() })
    }

    fn looper() -> InteractionLoop {
        let ui = UiController::new(ToolState::default(), Cooldown::new(0, TOGGLE_COOLDOWN_FRAMES));
        let canvas = DrawingCanvas::new(1280, 720, 5);
        InteractionLoop::new(ui, canvas, ThumbRule::default(), OverlayOptions::default())
    }

    fn show_board(lp: &mut InteractionLoop) {
        lp.ui.tick();
        lp.apply(Gesture::Outside(Point::new(100, 50)));
        assert!(lp.ui().visibility().board);
    }

    #[test]
    fn gestures_follow_fingers_and_board() {
        let mut lp = looper();
        let inside = Point::new(500, 400);
        let outside = Point::new(1150, 400);

        assert_eq!(classify_gesture(None, inside, lp.ui()), Gesture::None);
        assert_eq!(classify_gesture(fingers(false, true), inside, lp.ui()), Gesture::None);
        // Board hidden: nothing counts as inside.
        assert_eq!(classify_gesture(fingers(true, true), inside, lp.ui()), Gesture::Outside(inside));

        show_board(&mut lp);
        assert_eq!(classify_gesture(fingers(true, true), inside, lp.ui()), Gesture::Draw(inside));
        assert_eq!(classify_gesture(fingers(true, false), inside, lp.ui()), Gesture::Navigate(inside));
        assert_eq!(classify_gesture(fingers(true, true), outside, lp.ui()), Gesture::Outside(outside));
    }

    #[test]
    fn first_draw_frame_only_seeds_the_cursor() {
        let mut lp = looper();
        lp.apply(Gesture::Draw(Point::new(300, 300)));
        assert!(lp.canvas().is_blank());
        assert_eq!(lp.cursor(), Some(Point::new(300, 300)));

        lp.apply(Gesture::Draw(Point::new(340, 300)));
        assert!(!lp.canvas().is_blank());
        let buf = lp.canvas().buffer();
        for x in 300..=340 {
            assert_eq!(buf.get(x, 300), Some(Color::WHITE), "gap at {x}");
        }
        // Nothing towards the origin: no segment from a (0,0) sentinel.
        assert_eq!(buf.get(150, 150), Some(Color::BLACK));
    }

    #[test]
    fn leaving_draw_breaks_the_stroke() {
        let mut lp = looper();
        lp.apply(Gesture::Draw(Point::new(300, 300)));
        lp.apply(Gesture::None);
        assert_eq!(lp.cursor(), None);
        lp.apply(Gesture::Draw(Point::new(600, 300)));
        assert!(lp.canvas().is_blank());

        lp.apply(Gesture::Navigate(Point::new(600, 600)));
        assert_eq!(lp.cursor(), None);
    }

    #[test]
    fn clear_button_wipes_the_canvas() {
        let mut lp = looper();
        lp.apply(Gesture::Draw(Point::new(300, 300)));
        lp.apply(Gesture::Draw(Point::new(400, 400)));
        assert!(!lp.canvas().is_blank());

        lp.ui.tick();
        lp.apply(Gesture::Outside(Point::new(250, 50))); // show colors
        let events = lp.apply(Gesture::Outside(Point::new(950, 50)));
        assert!(events.contains(&UiEvent::ClearCanvas));
        assert!(lp.canvas().is_blank());
    }

    #[test]
    fn hidden_board_passes_camera_through_under_widgets() {
        let mut lp = looper();
        let camera = FrameBuffer::filled(1280, 720, Color::rgb(128, 128, 128));
        lp.apply(Gesture::Draw(Point::new(300, 300)));
        lp.apply(Gesture::Draw(Point::new(400, 300)));

        let out = lp.process_frame(&camera, None).unwrap();
        // Strokes exist but the board is hidden.
        assert_eq!(out.get(350, 300), Some(Color::rgb(128, 128, 128)));
        // Board toggle is always drawn.
        assert_ne!(out.get(100, 50), Some(Color::rgb(128, 128, 128)));
    }

    #[test]
    fn visible_board_shows_strokes() {
        let mut lp = looper();
        show_board(&mut lp);
        for _ in 0..TOGGLE_COOLDOWN_FRAMES {
            lp.ui.tick();
        }
        lp.apply(Gesture::Outside(Point::new(250, 50))); // show colors
        assert!(lp.ui().visibility().colors);
        lp.apply(Gesture::Navigate(Point::new(450, 50))); // red
        assert_eq!(lp.ui().tools().color, RED);

        lp.apply(Gesture::Draw(Point::new(300, 300)));
        lp.apply(Gesture::Draw(Point::new(400, 300)));
        let camera = FrameBuffer::filled(1280, 720, Color::rgb(128, 128, 128));
        let out = lp.process_frame(&camera, None).unwrap();
        assert_eq!(out.get(350, 300), Some(RED));
        // Whiteboard backdrop lightens the video elsewhere on the board.
        let board = out.get(350, 500).unwrap();
        assert!(board.r > 128 && board.r == board.g && board.g == board.b);
    }
}
