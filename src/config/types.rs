use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Settings for one canvas element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Surface width in pixels (default: 640).
    #[serde(default = "default_width")]
    pub width: u32,
    /// Surface height in pixels (default: 480).
    #[serde(default = "default_height")]
    pub height: u32,
    /// Tick rate of the frame timer (default: 30).
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Element id the surface is registered under (default: "canvas").
    #[serde(default = "default_surface_id")]
    pub surface_id: String,
    /// Turns a draw waits for its surface to mount (default: 8).
    #[serde(default = "default_max_mount_retries")]
    pub max_mount_retries: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
            surface_id: default_surface_id(),
            max_mount_retries: default_max_mount_retries(),
        }
    }
}

/// Settings for the bundled demo binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Ticks to run before writing the frame and exiting (default: 120).
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Where the final frame is written as PNG (default: "frame.png").
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Image drawn at the ball position, if any.
    #[serde(default)]
    pub sprite: Option<String>,
    /// Directory relative image sources resolve against (default: ".").
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            output: default_output(),
            sprite: None,
            asset_root: default_asset_root(),
        }
    }
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

fn default_fps() -> f64 {
    30.0
}

fn default_surface_id() -> String {
    "canvas".to_string()
}

fn default_max_mount_retries() -> u32 {
    8
}

fn default_frames() -> u64 {
    120
}

fn default_output() -> PathBuf {
    PathBuf::from("frame.png")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from(".")
}
