//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use mvu_canvas::canvas::{CanvasEnv, ImageCache, OpLog, SourceLoader};
use mvu_canvas::config::CanvasConfig;
use mvu_canvas::input::InputSource;
use mvu_canvas::vdom::{Document, Reconciler};
use parking_lot::Mutex;

/// Reconciler over plain strings that remembers every commit.
#[derive(Clone, Default)]
pub struct StringReconciler {
    pub commits: Arc<Mutex<Vec<String>>>,
}

impl StringReconciler {
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().clone()
    }
}

impl Reconciler for StringReconciler {
    type Node = String;
    type Committed = String;

    fn mount(&mut self, node: String) -> String {
        self.commits.lock().push(node.clone());
        node
    }

    fn patch(&mut self, _previous: String, next: String) -> String {
        self.commits.lock().push(next.clone());
        next
    }
}

/// Small canvas config for tests.
pub fn canvas_config(width: u32, height: u32) -> CanvasConfig {
    CanvasConfig {
        width,
        height,
        fps: 10.0,
        surface_id: "test-canvas".to_string(),
        max_mount_retries: 4,
    }
}

/// Environment whose surfaces record into the returned log.
pub fn recording_env() -> (CanvasEnv, OpLog) {
    let log = OpLog::new();
    let env = CanvasEnv {
        document: Arc::new(Document::recording(log.clone())),
        images: ImageCache::with_default_loader(),
        input: InputSource::new(),
    };
    (env, log)
}

/// Environment with pixel-backed surfaces.
pub fn raster_env() -> CanvasEnv {
    CanvasEnv {
        document: Arc::new(Document::raster()),
        images: ImageCache::with_default_loader(),
        input: InputSource::new(),
    }
}

/// Solid-colour image of the given size.
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

/// `data:image/png;base64,...` URI for `image`.
pub fn png_data_uri(image: &RgbaImage) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png_bytes(image));
    format!("data:image/png;base64,{}", payload)
}
