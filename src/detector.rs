//! Hand landmark detection boundary.
//!
//! The board only needs "zero or more hands, 21 normalized points each" per frame. The
//! production detector is MediaPipe running in a Python subprocess: we write each frame
//! as a small header plus raw RGB bytes to its stdin and read one JSON line back.
//!
//! # Protocol
//!
//! ```text
//! start-up   <- "READY\n"
//! per frame  -> width:u32le height:u32le channels:u32le (=3) | width*height*3 RGB bytes
//!            <- {"hands":[{"handedness":"Right","score":0.97,"landmarks":[{"x":..,"y":..,"z":..}, ...]}],"error":null}
//! ```
//!
//! The default configuration runs `hand_detect.py` from the crate root with the Python in
//! `.venv`. Set it up once with [`SETUP_HINT`].

use log::{debug, info, warn};
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::config::DetectorConfig;
use crate::error::{Error, Result};
use crate::landmarks::{DetectedHand, Handedness, NormalizedLandmark, LANDMARK_COUNT};
use crate::types::FrameBuffer;

/// Shell command that prepares the default detector environment.
pub const SETUP_HINT: &str = "python3 -m venv .venv && .venv/bin/pip install mediapipe numpy";

/// Anything that can find hands in a frame.
pub trait HandDetector {
    /// All hands found in `frame`, best first.
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<DetectedHand>>;
}

/// JSON structures for parsing detector output
#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<NormalizedLandmark>,
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one response line. Hands with the wrong landmark count are skipped;
/// a detector-reported error yields no hands.
pub fn parse_response(line: &str) -> Result<Vec<DetectedHand>> {
    let result: DetectionResult = serde_json::from_str(line.trim())
        .map_err(|e| Error::DetectorProtocol(format!("bad response {:?}: {e}", line.trim())))?;

    if let Some(error) = result.error {
        warn!("Detector error: {error}");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(result.hands.len());
    for hand in result.hands {
        let Ok(landmarks) = <[NormalizedLandmark; LANDMARK_COUNT]>::try_from(hand.landmarks.as_slice()) else {
            warn!("Expected {LANDMARK_COUNT} landmarks, got {}", hand.landmarks.len());
            continue;
        };
        let handedness = if hand.handedness.eq_ignore_ascii_case("left") {
            Handedness::Left
        } else {
            Handedness::Right
        };
        hands.push(DetectedHand { landmarks, score: hand.score, handedness });
    }
    Ok(hands)
}

/// The first hand scoring at least `threshold`; the board tracks a single hand.
pub fn first_confident(hands: Vec<DetectedHand>, threshold: f32) -> Option<DetectedHand> {
    hands.into_iter().find(|h| h.score >= threshold)
}

/// Encode one frame as a detector request.
pub fn encode_request(frame: &FrameBuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(12 + frame.pixels.len() * 3);
    out.extend_from_slice(&(frame.width as u32).to_le_bytes());
    out.extend_from_slice(&(frame.height as u32).to_le_bytes());
    out.extend_from_slice(&3u32.to_le_bytes());
    out.extend_from_slice(&frame.to_rgb_bytes());
    out
}

/// Fail early, with the fix in the message, when the interpreter or script is missing.
/// Bare program names are left to the `PATH` lookup at spawn time.
pub fn check_setup(cfg: &DetectorConfig) -> Result<()> {
    if cfg.program.components().count() > 1 && !cfg.program.exists() {
        return Err(Error::DetectorStart(format!(
            "Python environment not found at {}. Run: {SETUP_HINT}",
            cfg.program.display()
        )));
    }
    for script in cfg.args.iter().filter(|a| a.ends_with(".py")) {
        if !Path::new(script).exists() {
            return Err(Error::DetectorStart(format!(
                "detector script {script} not found; run from the directory containing hand_detect.py \
                 or set detector.args in the config"
            )));
        }
    }
    Ok(())
}

/// Hand detector backed by a MediaPipe subprocess.
pub struct SubprocessDetector {
    process: Child,
    stdin: ChildStdin,
    stdout_reader: BufReader<ChildStdout>,
}

impl SubprocessDetector {
    /// Start the detector and wait for its READY line.
    pub fn spawn(cfg: &DetectorConfig) -> Result<Self> {
        check_setup(cfg)?;
        info!("Starting hand detector: {} {}", cfg.program.display(), cfg.args.join(" "));

        let mut process = Command::new(&cfg.program)
            .args(&cfg.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::DetectorStart(format!("{}: {e}", cfg.program.display())))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| Error::DetectorStart("no stdin pipe".to_string()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::DetectorStart("no stdout pipe".to_string()))?;
        let mut stdout_reader = BufReader::new(stdout);

        let mut ready_line = String::new();
        stdout_reader.read_line(&mut ready_line)?;
        if ready_line.trim() != "READY" {
            let _ = process.kill();
            return Err(Error::DetectorStart(format!(
                "detector did not signal ready, got: {:?}",
                ready_line.trim()
            )));
        }

        info!("Hand detector ready");
        Ok(Self { process, stdin, stdout_reader })
    }
}

impl HandDetector for SubprocessDetector {
    fn detect(&mut self, frame: &FrameBuffer) -> Result<Vec<DetectedHand>> {
        self.stdin.write_all(&encode_request(frame))?;
        self.stdin.flush()?;

        let mut response = String::new();
        if self.stdout_reader.read_line(&mut response)? == 0 {
            return Err(Error::DetectorProtocol("detector closed its output".to_string()));
        }
        let hands = parse_response(&response)?;
        debug!("detector: {} hand(s)", hands.len());
        Ok(hands)
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        // Kill the subprocess when the detector is dropped
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}
