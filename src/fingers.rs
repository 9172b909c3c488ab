//! Finger up/down classification from a single frame's landmarks.
//!
//! Purely geometric and stateless: the same landmarks always give the same answer.

use crate::landmarks::{index, Handedness, HandLandmarks};

/// Default lateral separation (pixels) between thumb tip and index knuckle.
pub const THUMB_SPREAD_PX: i32 = 10;

/// Up/down state of the five fingers, thumb first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    pub fn as_array(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

}

/// Parameters of the thumb test; the other fingers need none. `handedness` is the
/// fallback for hands the detector did not label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbRule {
    pub handedness: Handedness,
    pub spread_px: i32,
}

impl Default for ThumbRule {
    fn default() -> Self {
        Self { handedness: Handedness::Right, spread_px: THUMB_SPREAD_PX }
    }
}

/// Classify the first detected hand, or `None` when no hand was seen this frame.
pub fn classify(hand: Option<&HandLandmarks>, rule: ThumbRule) -> Option<FingerState> {
    hand.map(|h| finger_state(h, rule))
}

pub fn finger_state(hand: &HandLandmarks, rule: ThumbRule) -> FingerState {
    FingerState {
        thumb: thumb_up(hand, rule),
        index: finger_up(hand, index::INDEX_FINGER_TIP, index::INDEX_FINGER_PIP, index::INDEX_FINGER_MCP),
        middle: finger_up(hand, index::MIDDLE_FINGER_TIP, index::MIDDLE_FINGER_PIP, index::MIDDLE_FINGER_MCP),
        ring: finger_up(hand, index::RING_FINGER_TIP, index::RING_FINGER_PIP, index::RING_FINGER_MCP),
        pinky: finger_up(hand, index::PINKY_TIP, index::PINKY_PIP, index::PINKY_MCP),
    }
}

/// Tip above the middle joint, which is above the knuckle (y grows downward).
fn finger_up(hand: &HandLandmarks, tip: usize, pip: usize, mcp: usize) -> bool {
    let (tip, pip, mcp) = (hand.point(tip), hand.point(pip), hand.point(mcp));
    tip.y < pip.y && pip.y < mcp.y
}

// A closed fist leaves the thumb tip resting on the index knuckle; an open thumb is
// raised above its IP joint and pulled away sideways.
fn thumb_up(hand: &HandLandmarks, rule: ThumbRule) -> bool {
    let tip = hand.point(index::THUMB_TIP);
    let ip = hand.point(index::THUMB_IP);
    let knuckle = hand.point(index::INDEX_FINGER_MCP);
    let spread = match hand.handedness.unwrap_or(rule.handedness) {
        Handedness::Right => knuckle.x - tip.x,
        Handedness::Left => tip.x - knuckle.x,
    };
    tip.y < ip.y && spread > rule.spread_px
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LANDMARK_COUNT;
    use crate::types::Point;

    /// Every finger curled: all points of a finger at the same height.
    fn fist() -> [Point; LANDMARK_COUNT] {
        [Point::new(100, 300); LANDMARK_COUNT]
    }

    fn set_finger(points: &mut [Point; LANDMARK_COUNT], tip: usize, ys: [i32; 3]) {
        // tip, dip, pip, mcp are consecutive indices counting down from the tip
        points[tip].y = ys[0];
        points[tip - 1].y = (ys[0] + ys[1]) / 2;
        points[tip - 2].y = ys[1];
        points[tip - 3].y = ys[2];
    }

    #[test]
    fn no_hand_gives_no_state() {
        assert_eq!(classify(None, ThumbRule::default()), None);
    }

    #[test]
    fn fist_has_no_fingers_up() {
        let hand = HandLandmarks::new(fist());
        assert_eq!(finger_state(&hand, ThumbRule::default()), FingerState::default());
    }

    #[test]
    fn strictly_rising_finger_is_up() {
        let mut pts = fist();
        set_finger(&mut pts, index::INDEX_FINGER_TIP, [100, 200, 250]);
        let state = finger_state(&HandLandmarks::new(pts), ThumbRule::default());
        assert!(state.index);
        assert!(!state.middle && !state.ring && !state.pinky && !state.thumb);
        assert_eq!(state.as_array().iter().filter(|&&up| up).count(), 1);
    }

    #[test]
    fn any_ordering_violation_means_down() {
        let tips = [
            index::INDEX_FINGER_TIP,
            index::MIDDLE_FINGER_TIP,
            index::RING_FINGER_TIP,
            index::PINKY_TIP,
        ];
        let bad_triples = [
            [200, 100, 250], // tip below middle joint
            [100, 250, 200], // middle joint below knuckle
            [100, 100, 250], // tie is not strict
            [100, 200, 200],
            [250, 200, 100], // pointing down
        ];
        for &tip in &tips {
            for ys in bad_triples {
                let mut pts = fist();
                set_finger(&mut pts, tip, ys);
                let up = finger_state(&HandLandmarks::new(pts), ThumbRule::default()).as_array();
                assert!(up.iter().all(|&u| !u), "finger {tip} with {ys:?} classified up");
            }
        }
    }

    #[test]
    fn all_four_fingers_independent() {
        let mut pts = fist();
        set_finger(&mut pts, index::MIDDLE_FINGER_TIP, [50, 150, 280]);
        set_finger(&mut pts, index::PINKY_TIP, [120, 180, 260]);
        let state = finger_state(&HandLandmarks::new(pts), ThumbRule::default());
        assert_eq!(state.as_array(), [false, false, true, false, true]);
    }

    #[test]
    fn thumb_needs_height_and_spread() {
        let mut pts = fist();
        pts[index::INDEX_FINGER_MCP] = Point::new(200, 250);
        pts[index::THUMB_IP] = Point::new(160, 240);
        pts[index::THUMB_TIP] = Point::new(150, 200);
        let rule = ThumbRule::default();
        assert!(finger_state(&HandLandmarks::new(pts), rule).thumb);

        // Tucked against the knuckle: not enough spread.
        pts[index::THUMB_TIP] = Point::new(195, 200);
        assert!(!finger_state(&HandLandmarks::new(pts), rule).thumb);

        // Spread but hanging below the IP joint.
        pts[index::THUMB_TIP] = Point::new(150, 245);
        assert!(!finger_state(&HandLandmarks::new(pts), rule).thumb);
    }

    #[test]
    fn thumb_direction_follows_handedness() {
        let mut pts = fist();
        pts[index::INDEX_FINGER_MCP] = Point::new(200, 250);
        pts[index::THUMB_IP] = Point::new(230, 240);
        pts[index::THUMB_TIP] = Point::new(240, 200);
        let hand = HandLandmarks::new(pts);

        let right = ThumbRule { handedness: Handedness::Right, spread_px: THUMB_SPREAD_PX };
        let left = ThumbRule { handedness: Handedness::Left, spread_px: THUMB_SPREAD_PX };
        assert!(!finger_state(&hand, right).thumb);
        assert!(finger_state(&hand, left).thumb);
    }

    #[test]
    fn detected_label_overrides_configured_hand() {
        let mut pts = fist();
        pts[index::INDEX_FINGER_MCP] = Point::new(200, 250);
        pts[index::THUMB_IP] = Point::new(230, 240);
        pts[index::THUMB_TIP] = Point::new(240, 200);
        let right_rule = ThumbRule::default();

        let left_hand = HandLandmarks::new(pts).with_handedness(Handedness::Left);
        assert!(classify(Some(&left_hand), right_rule).unwrap().thumb);

        let right_hand = HandLandmarks::new(pts).with_handedness(Handedness::Right);
        let left_rule = ThumbRule { handedness: Handedness::Left, ..right_rule };
        assert!(!classify(Some(&right_hand), left_rule).unwrap().thumb);
    }
}
