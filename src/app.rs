//! Frame loop: camera -> detector -> interaction -> window, one frame at a time.

use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::canvas::{CompositeStages, DrawingCanvas};
use crate::camera::FrameSource;
use crate::config::Config;
use crate::detector::{first_confident, HandDetector};
use crate::draw::Drawer;
use crate::error::Result;
use crate::interaction::InteractionLoop;
use crate::landmarks::HandLandmarks;
use crate::types::FrameBuffer;
use crate::ui::UiController;

/// Where finished frames go.
pub trait Display {
    fn is_open(&self) -> bool;
    /// Checked once per frame; true ends the session.
    fn quit_requested(&self) -> bool;
    /// Edge-triggered request to switch the diagnostics view.
    fn cycle_requested(&self) -> bool {
        false
    }
    fn present(&mut self, frame: &FrameBuffer) -> Result<()>;
}

impl Display for Drawer {
    fn is_open(&self) -> bool {
        Drawer::is_open(self)
    }

    fn quit_requested(&self) -> bool {
        self.quit_pressed()
    }

    fn cycle_requested(&self) -> bool {
        self.tab_pressed_once()
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        Drawer::present(self, frame)
    }
}

/// Which compositing buffer the diagnostics window shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiagnosticView {
    #[default]
    Canvas,
    Gray,
    Mask,
    Masked,
}

impl DiagnosticView {
    pub fn next(self) -> Self {
        match self {
            DiagnosticView::Canvas => DiagnosticView::Gray,
            DiagnosticView::Gray => DiagnosticView::Mask,
            DiagnosticView::Mask => DiagnosticView::Masked,
            DiagnosticView::Masked => DiagnosticView::Canvas,
        }
    }

    pub fn render(self, canvas: &DrawingCanvas, stages: &CompositeStages) -> FrameBuffer {
        match self {
            DiagnosticView::Canvas => canvas.buffer().clone(),
            DiagnosticView::Gray => FrameBuffer::from_gray_image(&stages.gray),
            DiagnosticView::Mask => FrameBuffer::from_gray_image(&stages.mask),
            DiagnosticView::Masked => stages.masked.clone(),
        }
    }
}

/// All per-session state: panel, canvas, stroke cursor.
pub struct Session {
    interaction: InteractionLoop,
    confidence_threshold: f32,
}

impl Session {
    /// Fresh session for frames of `width` x `height`.
    pub fn new(cfg: &Config, width: usize, height: usize) -> Self {
        let ui = UiController::for_frame(cfg.tool_state(), cfg.cooldown(), width, height);
        let canvas = DrawingCanvas::new(width, height, cfg.tools.eraser_size);
        Self {
            interaction: InteractionLoop::new(ui, canvas, cfg.thumb_rule(), cfg.overlay()),
            confidence_threshold: cfg.detector.confidence_threshold,
        }
    }

    pub fn interaction(&self) -> &InteractionLoop {
        &self.interaction
    }

    /// Find the hand in `frame`. Detector failures count as "no hand" for this frame.
    pub fn locate_hand(&self, frame: &FrameBuffer, detector: &mut dyn HandDetector) -> Option<HandLandmarks> {
        let hands = match detector.detect(frame) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("Hand detection failed: {e}");
                return None;
            }
        };
        first_confident(hands, self.confidence_threshold).map(|h| h.to_pixels(frame.width, frame.height))
    }

    /// Detect, interact and composite one camera frame.
    pub fn step(&mut self, frame: &FrameBuffer, detector: &mut dyn HandDetector) -> Result<FrameBuffer> {
        let hand = self.locate_hand(frame, detector);
        self.interaction.process_frame(frame, hand.as_ref())
    }
}

/// Run until the source ends, the window closes or the user quits. Returns frames shown.
pub fn run(
    session: &mut Session,
    source: &mut dyn FrameSource,
    detector: &mut dyn HandDetector,
    display: &mut dyn Display,
    mut diagnostics: Option<&mut dyn Display>,
) -> Result<u64> {
    let mut frames: u64 = 0;
    let mut view = DiagnosticView::default();

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;

    while display.is_open() && !display.quit_requested() {
        // 1) Grab a fresh live frame; a failed read is the end of the stream.
        let Some(live) = source.next_frame() else {
            info!("Camera stream ended");
            break;
        };

        // 2) Hand -> gesture -> panel/canvas -> composited frame
        let out = session.step(&live, detector)?;
        display.present(&out)?;
        frames += 1;

        // 3) Optional window with one compositing stage
        if let Some(diag) = diagnostics.as_deref_mut() {
            if diag.cycle_requested() || display.cycle_requested() {
                view = view.next();
                info!("Diagnostics view: {view:?}");
            }
            if diag.is_open() {
                let stages = session.interaction().composite_stages(&live)?;
                diag.present(&view.render(session.interaction().canvas(), &stages))?;
            }
        }

        // 4) FPS counter once per second
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            debug!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("Session finished after {frames} frames");
    Ok(frames)
}
