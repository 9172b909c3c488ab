//! Hand landmark sets as delivered by the detector.
//!
//! The detector reports 21 points per hand in normalized [0,1] image coordinates; the
//! core works on [`HandLandmarks`], the same points scaled to frame pixels.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Hand landmark indices (MediaPipe hand landmark model convention)
#[allow(dead_code)]
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

pub const LANDMARK_COUNT: usize = 21;

/// Bones drawn when the hand skeleton overlay is enabled.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// Which hand the detector believes it saw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    #[default]
    Right,
}

/// A single landmark in normalized image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct NormalizedLandmark {
    /// X coordinate (0.0 to 1.0, normalized to image width)
    pub x: f32,
    /// Y coordinate (0.0 to 1.0, normalized to image height)
    pub y: f32,
    /// Z coordinate (depth, relative to wrist); unused by the board
    #[serde(default)]
    pub z: f32,
}

/// One hand as reported by the detector.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedHand {
    pub landmarks: [NormalizedLandmark; LANDMARK_COUNT],
    /// Confidence score (0.0 to 1.0)
    pub score: f32,
    pub handedness: Handedness,
}

impl DetectedHand {
    /// Scale to pixel coordinates of a `width` x `height` frame (truncating toward zero).
    pub fn to_pixels(&self, width: usize, height: usize) -> HandLandmarks {
        let mut points = [Point::default(); LANDMARK_COUNT];
        for (p, lm) in points.iter_mut().zip(self.landmarks.iter()) {
            *p = Point::new((lm.x * width as f32) as i32, (lm.y * height as f32) as i32);
        }
        HandLandmarks { points, handedness: Some(self.handedness) }
    }
}

/// 21 landmark points of one hand in frame pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandLandmarks {
    pub points: [Point; LANDMARK_COUNT],
    /// Detector's left/right label, when it gave one.
    pub handedness: Option<Handedness>,
}

impl HandLandmarks {
    /// Points with no handedness label; classification uses the configured hand.
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self {
        Self { points, handedness: None }
    }

    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = Some(handedness);
        self
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        self.points[idx]
    }

    /// The index fingertip, used for all pointing and drawing.
    #[inline]
    pub fn fingertip(&self) -> Point {
        self.points[index::INDEX_FINGER_TIP]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_points_scale_to_frame_pixels() {
        let mut landmarks = [NormalizedLandmark::default(); LANDMARK_COUNT];
        landmarks[index::INDEX_FINGER_TIP] = NormalizedLandmark { x: 0.5, y: 0.25, z: 0.0 };
        landmarks[index::WRIST] = NormalizedLandmark { x: 0.999, y: 1.0, z: 0.0 };
        let hand = DetectedHand { landmarks, score: 0.9, handedness: Handedness::Right };

        let px = hand.to_pixels(1280, 720);
        assert_eq!(px.fingertip(), Point::new(640, 180));
        assert_eq!(px.point(index::WRIST), Point::new(1278, 720));
    }

    #[test]
    fn scaling_keeps_the_detected_hand_label() {
        let landmarks = [NormalizedLandmark::default(); LANDMARK_COUNT];
        let left = DetectedHand { landmarks, score: 0.9, handedness: Handedness::Left };
        assert_eq!(left.to_pixels(640, 480).handedness, Some(Handedness::Left));
        assert_eq!(HandLandmarks::new([Point::default(); LANDMARK_COUNT]).handedness, None);
    }

    #[test]
    fn every_connection_references_a_landmark() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < LANDMARK_COUNT && b < LANDMARK_COUNT);
        }
    }
}
