use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Bouncing-ball demo for the canvas runtime.
#[derive(Parser, Debug, Default)]
#[command(name = "mvu-canvas", version)]
pub struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ticks to run before writing the frame (0 runs until Ctrl-C)
    #[arg(long)]
    pub frames: Option<u64>,

    #[arg(long)]
    pub fps: Option<f64>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// PNG file the last frame is written to
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Image drawn in place of the ball (path or data: URI)
    #[arg(long)]
    pub sprite: Option<String>,

    /// Read keys and mouse clicks from the terminal
    #[arg(long)]
    pub interactive: bool,
}

impl Cli {
    /// Overlay flags that were given onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(frames) = self.frames {
            config.demo.frames = frames;
        }
        if let Some(fps) = self.fps {
            config.canvas.fps = fps;
        }
        if let Some(width) = self.width {
            config.canvas.width = width;
        }
        if let Some(height) = self.height {
            config.canvas.height = height;
        }
        if let Some(output) = &self.output {
            config.demo.output = output.clone();
        }
        if let Some(sprite) = &self.sprite {
            config.demo.sprite = Some(sprite.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_only_what_is_given() {
        let cli = Cli::parse_from(["mvu-canvas", "--frames", "5", "--width", "32"]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.demo.frames, 5);
        assert_eq!(config.canvas.width, 32);
        assert_eq!(config.canvas.height, 480);
        assert!(!cli.interactive);
    }
}
