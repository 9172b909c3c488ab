// Opens the camera and converts frames into a buffer suitable for the window.
// Visual expectation: when the session calls `next_frame()`, you get a mirrored
// 0x00RRGGBB frame ready to draw on, or None once the camera stops delivering.

use log::{info, warn};

use crate::config::CameraConfig;
use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Anything that produces video frames. `None` means end of stream.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<FrameBuffer>;

    /// Resolution of the frames this source produces.
    fn resolution(&self) -> (u32, u32);
}

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open the configured camera at the target resolution (falls back if not exact).
    /// On success, nothing is shown on screen yet; we just hold an open stream.
    pub fn new(cfg: &CameraConfig) -> Result<Self, Error> {
        // 1) Choose the device (0 = default webcam)
        let idx = CameraIndex::Index(cfg.index);

        let fmt = CameraFormat::new(
            Resolution::new(cfg.width, cfg.height),
            FrameFormat::MJPEG, // most webcams only reach 720p compressed
            cfg.fps,
        );

        // 2) Ask for RGB frames, closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // 3) Create the camera (this might fail if no device exists).
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        // 4) Start streaming frames from the camera.
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // 5) The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        info!(
            "Opened camera {} at {}x{} (requested {}x{})",
            cfg.index,
            actual.width(),
            actual.height(),
            cfg.width,
            cfg.height
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            mirror: cfg.mirror,
        })
    }
}

impl FrameSource for CameraCapture {
    /// Grab one frame (blocks until ready). A failed read ends the stream.
    fn next_frame(&mut self) -> Option<FrameBuffer> {
        let frame = match self.cam.frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Camera read failed, ending stream: {e}");
                return None;
            }
        };

        // Decode to an ImageBuffer<Rgb<u8>, Vec<u8>> (handles various raw formats safely).
        let rgb_img = match frame.decode_image::<RgbFormat>() {
            Ok(img) => img,
            Err(e) => {
                warn!("Camera frame decode failed, ending stream: {e}");
                return None;
            }
        };

        // Pack as 0x00RRGGBB for the window.
        let (w, h) = rgb_img.dimensions();
        let mut fb = match FrameBuffer::from_rgb_bytes(w as usize, h as usize, rgb_img.as_raw()) {
            Ok(fb) => fb,
            Err(e) => {
                warn!("Camera frame has unexpected layout, ending stream: {e}");
                return None;
            }
        };
        if self.mirror {
            fb.mirror_horizontal();
        }
        Some(fb)
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        if let Err(e) = self.cam.stop_stream() {
            warn!("Failed to stop camera stream: {e}");
        }
    }
}
