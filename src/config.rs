//! Configuration for the virtual board, loaded from an optional JSON file.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fingers::{ThumbRule, THUMB_SPREAD_PX};
use crate::interaction::OverlayOptions;
use crate::landmarks::Handedness;
use crate::types::Color;
use crate::ui::{Cooldown, ToolState, PEN_SIZES, STARTUP_COOLDOWN_FRAMES, TOGGLE_COOLDOWN_FRAMES};

/// Largest eraser the board accepts, in pixels.
pub const MAX_ERASER_SIZE: i32 = 200;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub detector: DetectorConfig,
    pub tools: ToolConfig,
    pub interaction: InteractionConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Device index (0 = default webcam)
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Flip frames left/right so the video behaves like a mirror
    pub mirror: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Interpreter or executable that runs the landmark detector
    pub program: PathBuf,
    /// Arguments passed to `program` (usually the script path)
    pub args: Vec<String>,
    /// Hands scoring below this are ignored (0.0-1.0)
    pub confidence_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub initial_color: Color,
    pub brush_size: i32,
    pub eraser_size: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Frames a show/hide toggle stays locked after firing
    pub toggle_cooldown: u32,
    /// Toggle lock at start-up
    pub startup_cooldown: u32,
    /// Thumb direction for hands the detector does not label
    pub handedness: Handedness,
    /// Minimum sideways thumb spread in pixels
    pub thumb_spread_px: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub title: String,
    pub show_landmarks: bool,
    pub brush_preview: bool,
    /// Open a second window with the compositing stages
    pub diagnostics: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { index: 0, width: 1280, height: 720, fps: 30, mirror: true }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(".venv/bin/python"),
            args: vec!["hand_detect.py".to_string()],
            confidence_threshold: 0.8,
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        let tools = ToolState::default();
        Self {
            initial_color: tools.color,
            brush_size: tools.brush_size,
            eraser_size: tools.eraser_size,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            toggle_cooldown: TOGGLE_COOLDOWN_FRAMES,
            startup_cooldown: STARTUP_COOLDOWN_FRAMES,
            handedness: Handedness::Right,
            thumb_spread_px: THUMB_SPREAD_PX,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Virtual Board".to_string(),
            show_landmarks: true,
            brush_preview: true,
            diagnostics: false,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, falling back to defaults when it cannot be read.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match Self::from_file(path) {
            Ok(cfg) => Ok(cfg),
            Err(Error::Io(e)) => {
                warn!("Failed to read config {}: {e}. Using defaults.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Save configuration as pretty JSON.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(Error::Config("camera resolution must be non-zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.detector.confidence_threshold) {
            return Err(Error::Config(
                "confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !PEN_SIZES.contains(&self.tools.brush_size) {
            return Err(Error::Config(format!(
                "brush size {} is not one of {PEN_SIZES:?}",
                self.tools.brush_size
            )));
        }
        if !(1..=MAX_ERASER_SIZE).contains(&self.tools.eraser_size) {
            return Err(Error::Config(format!(
                "eraser size {} must be between 1 and {MAX_ERASER_SIZE}",
                self.tools.eraser_size
            )));
        }
        if self.interaction.toggle_cooldown == 0 {
            return Err(Error::Config("toggle cooldown must be at least one frame".to_string()));
        }
        if self.interaction.thumb_spread_px < 0 {
            return Err(Error::Config("thumb spread must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn tool_state(&self) -> ToolState {
        ToolState {
            color: self.tools.initial_color,
            brush_size: self.tools.brush_size,
            eraser_size: self.tools.eraser_size,
        }
    }

    pub fn cooldown(&self) -> Cooldown {
        Cooldown::new(self.interaction.startup_cooldown, self.interaction.toggle_cooldown)
    }

    pub fn thumb_rule(&self) -> ThumbRule {
        ThumbRule {
            handedness: self.interaction.handedness,
            spread_px: self.interaction.thumb_spread_px,
        }
    }

    pub fn overlay(&self) -> OverlayOptions {
        OverlayOptions {
            show_landmarks: self.display.show_landmarks,
            brush_preview: self.display.brush_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!((cfg.camera.width, cfg.camera.height), (1280, 720));
        assert_eq!(cfg.tool_state(), ToolState::default());
        assert_eq!(cfg.cooldown().remaining(), STARTUP_COOLDOWN_FRAMES);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let json = r#"{ "tools": { "eraser_size": 40 }, "interaction": { "handedness": "Left" } }"#;
        let cfg: Config = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.tools.eraser_size, 40);
        assert_eq!(cfg.tools.brush_size, 5);
        assert_eq!(cfg.thumb_rule().handedness, Handedness::Left);
        assert!(cfg.camera.mirror);
    }

    #[test]
    fn rejects_brush_sizes_the_panel_cannot_produce() {
        let mut cfg = Config::default();
        cfg.tools.brush_size = 0;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        cfg.tools.brush_size = 7;
        assert!(cfg.validate().is_err());
        cfg.tools.brush_size = 20;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_bad_thresholds_and_cooldown() {
        let mut cfg = Config::default();
        cfg.detector.confidence_threshold = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.interaction.toggle_cooldown = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.tools.eraser_size = -3;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn eraser_size_is_bounded() {
        let mut cfg = Config::default();
        cfg.tools.eraser_size = MAX_ERASER_SIZE;
        assert!(cfg.validate().is_ok());
        cfg.tools.eraser_size = MAX_ERASER_SIZE + 1;
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        cfg.tools.eraser_size = 100_000;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::load_or_default(Some(Path::new("/nonexistent/virtual-board.json"))).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("virtual-board-{}.json", std::process::id()));
        let mut cfg = Config::default();
        cfg.display.diagnostics = true;
        cfg.tools.initial_color = Color::rgb(0, 0, 255);
        cfg.to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, cfg);
    }
}
