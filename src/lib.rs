//! Gesture-driven virtual whiteboard over a live camera feed.
//!
//! Each frame a hand-landmark detector reports the user's hand; the index fingertip
//! then either works the on-screen button panel (color, pen size, eraser, clear,
//! show/hide toggles) or, with index and middle finger raised over the whiteboard,
//! draws strokes into a persistent canvas that is composited over the video.
//!
//! The pipeline, one frame at a time:
//! 1. [`detector`] finds the hand, [`landmarks`] scales it to frame pixels
//! 2. [`fingers`] classifies which fingers are up
//! 3. [`interaction`] turns that into a gesture and drives [`ui`] or [`canvas`]
//! 4. [`canvas`] composites the strokes over the frame, [`widget`]s are drawn on top
//!
//! ```no_run
//! use virtual_board::{app::Session, config::Config, types::FrameBuffer};
//! use virtual_board::detector::HandDetector;
//! use virtual_board::landmarks::DetectedHand;
//!
//! struct NoHands;
//! impl HandDetector for NoHands {
//!     fn detect(&mut self, _: &FrameBuffer) -> virtual_board::Result<Vec<DetectedHand>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # fn main() -> virtual_board::Result<()> {
//! let cfg = Config::default();
//! let mut session = Session::new(&cfg, 1280, 720);
//! let frame = FrameBuffer::new(1280, 720);
//! let shown = session.step(&frame, &mut NoHands)?;
//! assert_eq!(shown.width, 1280);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod draw;
pub mod error;
pub mod fingers;
pub mod interaction;
pub mod landmarks;
pub mod types;
pub mod ui;
pub mod widget;

pub use error::{Error, Result};
