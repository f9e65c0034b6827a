//! The 2D drawing-context boundary and a recording implementation.

use std::sync::Arc;

use image::RgbaImage;
use parking_lot::Mutex;

use super::command::TextAlign;

/// Line width a context starts with, and the value ops reset it to.
pub const DEFAULT_LINE_WIDTH: f64 = 1.0;

/// Text alignment a context starts with ("start" in a left-to-right context).
pub const DEFAULT_TEXT_ALIGN: TextAlign = TextAlign::Left;

/// Stateful imperative drawing surface, modelled on the HTML canvas 2D API.
///
/// Styles are plain CSS strings; setting an empty string restores the
/// context default.
pub trait DrawingContext {
    fn set_fill_style(&mut self, style: &str);
    fn set_stroke_style(&mut self, style: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64);

    /// Current pixels, for contexts backed by a pixel buffer.
    fn snapshot(&self) -> Option<RgbaImage> {
        None
    }
}

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextOp {
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetFont(String),
    SetTextAlign(TextAlign),
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    StrokeRect { x: f64, y: f64, width: f64, height: f64 },
    BeginPath,
    ClosePath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start: f64, end: f64 },
    Fill,
    Stroke,
    FillText { text: String, x: f64, y: f64 },
    DrawImage { x: f64, y: f64, width: u32, height: u32 },
}

/// Shared, append-only log of context calls.
#[derive(Debug, Clone, Default)]
pub struct OpLog {
    ops: Arc<Mutex<Vec<ContextOp>>>,
}

impl OpLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, op: ContextOp) {
        self.ops.lock().push(op);
    }

    pub fn ops(&self) -> Vec<ContextOp> {
        self.ops.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<ContextOp> {
        std::mem::take(&mut *self.ops.lock())
    }

    /// Text of every `fill_text` call, in order.
    pub fn texts(&self) -> Vec<String> {
        self.ops
            .lock()
            .iter()
            .filter_map(|op| match op {
                ContextOp::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ops.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().is_empty()
    }
}

/// Context that draws nothing and records every call into an [`OpLog`].
#[derive(Debug, Clone, Default)]
pub struct RecordingContext {
    log: OpLog,
}

impl RecordingContext {
    pub fn new(log: OpLog) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &OpLog {
        &self.log
    }
}

impl DrawingContext for RecordingContext {
    fn set_fill_style(&mut self, style: &str) {
        self.log.push(ContextOp::SetFillStyle(style.to_string()));
    }

    fn set_stroke_style(&mut self, style: &str) {
        self.log.push(ContextOp::SetStrokeStyle(style.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.log.push(ContextOp::SetLineWidth(width));
    }

    fn set_font(&mut self, font: &str) {
        self.log.push(ContextOp::SetFont(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.log.push(ContextOp::SetTextAlign(align));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.log.push(ContextOp::FillRect { x, y, width, height });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.log.push(ContextOp::StrokeRect { x, y, width, height });
    }

    fn begin_path(&mut self) {
        self.log.push(ContextOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.log.push(ContextOp::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.log.push(ContextOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.log.push(ContextOp::LineTo { x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.log.push(ContextOp::Arc {
            x,
            y,
            radius,
            start: start_angle,
            end: end_angle,
        });
    }

    fn fill(&mut self) {
        self.log.push(ContextOp::Fill);
    }

    fn stroke(&mut self) {
        self.log.push(ContextOp::Stroke);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.log.push(ContextOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        self.log.push(ContextOp::DrawImage {
            x,
            y,
            width: image.width(),
            height: image.height(),
        });
    }
}
