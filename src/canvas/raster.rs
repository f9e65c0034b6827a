//! Software [`DrawingContext`] over an RGBA pixel buffer.

use std::f64::consts::TAU;

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut, Blend};
use imageproc::point::Point;
use imageproc::rect::Rect;

use super::command::TextAlign;
use super::context::{DrawingContext, DEFAULT_LINE_WIDTH, DEFAULT_TEXT_ALIGN};

const DEFAULT_STYLE: Rgba<u8> = Rgba([0, 0, 0, 255]);
const DEFAULT_FONT: &str = "10px sans-serif";

/// Text drawn on a raster context. No glyphs are rasterised; runs are kept
/// so callers can inspect what was written where.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font: String,
    pub align: TextAlign,
    pub color: Rgba<u8>,
}

#[derive(Debug, Clone, Default)]
struct SubPath {
    points: Vec<(f64, f64)>,
    closed: bool,
}

pub struct RasterContext {
    pixels: RgbaImage,
    fill_style: Rgba<u8>,
    stroke_style: Rgba<u8>,
    line_width: f64,
    font: String,
    text_align: TextAlign,
    path: Vec<SubPath>,
    texts: Vec<TextRun>,
}

impl RasterContext {
    /// A fully transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            fill_style: DEFAULT_STYLE,
            stroke_style: DEFAULT_STYLE,
            line_width: DEFAULT_LINE_WIDTH,
            font: DEFAULT_FONT.to_string(),
            text_align: DEFAULT_TEXT_ALIGN,
            path: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.pixels.width() && y < self.pixels.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    fn blended(&mut self, draw: impl FnOnce(&mut Blend<RgbaImage>)) {
        let mut canvas = Blend(std::mem::take(&mut self.pixels));
        draw(&mut canvas);
        self.pixels = canvas.0;
    }

    fn current_subpath(&mut self) -> &mut SubPath {
        if self.path.last().map_or(true, |sub| sub.closed) {
            let start = self
                .path
                .last()
                .and_then(|sub| sub.points.first().copied());
            self.path.push(SubPath {
                points: start.into_iter().collect(),
                closed: false,
            });
        }
        let last = self.path.len() - 1;
        &mut self.path[last]
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: Rgba<u8>) {
        let Some(polygon) = to_polygon(points) else {
            return;
        };
        self.blended(|canvas| draw_polygon_mut(canvas, &polygon, color));
    }

    fn stroke_segment(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>) {
        let width = self.line_width;
        let margin = width / 2.0 + 1.0;
        let bounds = (
            (-margin, -margin),
            (
                f64::from(self.pixels.width()) + margin,
                f64::from(self.pixels.height()) + margin,
            ),
        );
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };
        if width <= 1.5 {
            self.blended(|canvas| {
                draw_line_segment_mut(
                    canvas,
                    (from.0 as f32, from.1 as f32),
                    (to.0 as f32, to.1 as f32),
                    color,
                )
            });
            return;
        }

        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return;
        }
        let half = width / 2.0;
        let (nx, ny) = (-dy / length * half, dx / length * half);
        let quad = [
            (from.0 + nx, from.1 + ny),
            (to.0 + nx, to.1 + ny),
            (to.0 - nx, to.1 - ny),
            (from.0 - nx, from.1 - ny),
        ];
        self.fill_polygon(&quad, color);
    }

    fn stroke_points(&mut self, points: &[(f64, f64)], closed: bool, color: Rgba<u8>) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], color);
        }
        if closed && points.len() > 2 {
            self.stroke_segment(points[points.len() - 1], points[0], color);
        }
    }
}

impl DrawingContext for RasterContext {
    fn set_fill_style(&mut self, style: &str) {
        if let Some(color) = style_or_default(style) {
            self.fill_style = color;
        }
    }

    fn set_stroke_style(&mut self, style: &str) {
        if let Some(color) = style_or_default(style) {
            self.stroke_style = color;
        }
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.line_width = width;
        }
    }

    fn set_font(&mut self, font: &str) {
        self.font = if font.is_empty() {
            DEFAULT_FONT.to_string()
        } else {
            font.to_string()
        };
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = to_rect(x, y, width, height) else {
            return;
        };
        let color = self.fill_style;
        self.blended(|canvas| draw_filled_rect_mut(canvas, rect, color));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let corners = [(x, y), (x + width, y), (x + width, y + height), (x, y + height)];
        let color = self.stroke_style;
        self.stroke_points(&corners, true, color);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut() {
            sub.closed = true;
        }
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(SubPath {
            points: vec![(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.current_subpath().points.push((x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        if !(radius.is_finite() && radius >= 0.0) {
            return;
        }
        let sweep = (end_angle - start_angle).clamp(-TAU, TAU);
        let steps = ((radius * sweep.abs() / 2.0).ceil() as usize).clamp(8, 720);
        let sub = self.current_subpath();
        for i in 0..=steps {
            let angle = start_angle + sweep * (i as f64 / steps as f64);
            sub.points.push((x + radius * angle.cos(), y + radius * angle.sin()));
        }
    }

    fn fill(&mut self) {
        let color = self.fill_style;
        let subpaths = self.path.clone();
        for sub in subpaths {
            self.fill_polygon(&sub.points, color);
        }
    }

    fn stroke(&mut self) {
        let color = self.stroke_style;
        let subpaths = self.path.clone();
        for sub in subpaths {
            self.stroke_points(&sub.points, sub.closed, color);
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.texts.push(TextRun {
            text: text.to_string(),
            x,
            y,
            font: self.font.clone(),
            align: self.text_align,
            color: self.fill_style,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        imageops::overlay(&mut self.pixels, image, x.round() as i64, y.round() as i64);
    }

    fn snapshot(&self) -> Option<RgbaImage> {
        Some(self.pixels.clone())
    }
}

fn style_or_default(style: &str) -> Option<Rgba<u8>> {
    if style.trim().is_empty() {
        return Some(DEFAULT_STYLE);
    }
    parse_color(style)
}

fn to_rect(x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    let (x0, x1) = ordered(x, x + width);
    let (y0, y1) = ordered(y, y + height);
    let (left, top) = (x0.round() as i32, y0.round() as i32);
    let w = (x1.round() as i32).saturating_sub(left);
    let h = (y1.round() as i32).saturating_sub(top);
    (w > 0 && h > 0).then(|| Rect::at(left, top).of_size(w as u32, h as u32))
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Liang-Barsky clip of the segment to the `(min, max)` box. `None` when
/// nothing of it lies inside.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    bounds: ((f64, f64), (f64, f64)),
) -> Option<((f64, f64), (f64, f64))> {
    let ((min_x, min_y), (max_x, max_y)) = bounds;
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let (mut enter, mut exit) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, from.0 - min_x),
        (dx, max_x - from.0),
        (-dy, from.1 - min_y),
        (dy, max_y - from.1),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            exit = exit.min(t);
        }
        if enter > exit {
            return None;
        }
    }
    Some((
        (from.0 + enter * dx, from.1 + enter * dy),
        (from.0 + exit * dx, from.1 + exit * dy),
    ))
}

/// Integer polygon with consecutive duplicates removed and first != last,
/// as `draw_polygon_mut` requires.
fn to_polygon(points: &[(f64, f64)]) -> Option<Vec<Point<i32>>> {
    let mut polygon: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let point = Point::new(x.round() as i32, y.round() as i32);
        if polygon.last() != Some(&point) {
            polygon.push(point);
        }
    }
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }
    (polygon.len() >= 3).then_some(polygon)
}

/// Parse a CSS colour: named colours, `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)` and `rgba(r, g, b, a)`.
pub fn parse_color(input: &str) -> Option<Rgba<u8>> {
    let value = input.trim().to_ascii_lowercase();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }
    named_color(&value)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (slot, c) in rgb.iter_mut().zip(hex.chars()) {
                let v = c.to_digit(16)? as u8;
                *slot = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 | 8 => {
            let r = channel(hex.get(0..2)?)?;
            let g = channel(hex.get(2..4)?)?;
            let b = channel(hex.get(4..6)?)?;
            let a = if hex.len() == 8 {
                channel(hex.get(6..8)?)?
            } else {
                255
            };
            Some(Rgba([r, g, b, a]))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = match parts.get(3) {
        Some(a) => (a.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Rgba([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ]))
}

fn named_color(name: &str) -> Option<Rgba<u8>> {
    let rgb: [u8; 3] = match name {
        "transparent" => return Some(Rgba([0, 0, 0, 0])),
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "teal" => [0, 128, 128],
        "navy" => [0, 0, 128],
        "purple" => [128, 0, 128],
        "orange" => [255, 165, 0],
        "pink" => [255, 192, 203],
        "brown" => [165, 42, 42],
        _ => return None,
    };
    Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn parses_supported_color_forms() {
        assert_eq!(parse_color("red"), Some(RED));
        assert_eq!(parse_color(" White "), Some(WHITE));
        assert_eq!(parse_color("#f00"), Some(RED));
        assert_eq!(parse_color("#FF0000"), Some(RED));
        assert_eq!(parse_color("#ff000080"), Some(Rgba([255, 0, 0, 128])));
        assert_eq!(parse_color("rgb(255, 0, 0)"), Some(RED));
        assert_eq!(parse_color("rgba(0, 0, 255, 0.5)"), Some(Rgba([0, 0, 255, 128])));
        assert_eq!(parse_color("transparent"), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn rejects_unknown_colors() {
        assert_eq!(parse_color("not-a-color"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("rgb(1, 2)"), None);
    }

    #[test]
    fn invalid_style_keeps_previous_and_empty_resets() {
        let mut ctx = RasterContext::new(4, 4);
        ctx.set_fill_style("red");
        ctx.set_fill_style("bogus");
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(ctx.pixel(1, 1), Some(RED));

        ctx.set_fill_style("");
        ctx.fill_rect(0.0, 0.0, 4.0, 4.0);
        assert_eq!(ctx.pixel(1, 1), Some(DEFAULT_STYLE));
    }

    #[test]
    fn fill_rect_is_clipped_to_surface() {
        let mut ctx = RasterContext::new(10, 10);
        ctx.set_fill_style("red");
        ctx.fill_rect(5.0, 5.0, 100.0, 100.0);
        assert_eq!(ctx.pixel(9, 9), Some(RED));
        assert_eq!(ctx.pixel(4, 4), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn filled_full_arc_covers_center_not_corners() {
        let mut ctx = RasterContext::new(40, 40);
        ctx.set_fill_style("blue");
        ctx.begin_path();
        ctx.arc(20.0, 20.0, 10.0, 0.0, TAU);
        ctx.fill();
        ctx.close_path();

        assert_eq!(ctx.pixel(20, 20), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(ctx.pixel(26, 20), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(ctx.pixel(1, 1), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn thick_stroke_covers_line_width() {
        let mut ctx = RasterContext::new(20, 20);
        ctx.set_stroke_style("red");
        ctx.set_line_width(4.0);
        ctx.begin_path();
        ctx.move_to(2.0, 10.0);
        ctx.line_to(18.0, 10.0);
        ctx.stroke();

        assert_eq!(ctx.pixel(10, 9), Some(RED));
        assert_eq!(ctx.pixel(10, 11), Some(RED));
        assert_eq!(ctx.pixel(10, 2), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn far_off_line_is_clipped_to_surface() {
        let mut ctx = RasterContext::new(10, 10);
        ctx.set_stroke_style("red");
        ctx.begin_path();
        ctx.move_to(0.0, 5.0);
        ctx.line_to(1e9, 5.0);
        ctx.stroke();

        assert_eq!(ctx.pixel(0, 5), Some(RED));
        assert_eq!(ctx.pixel(9, 5), Some(RED));
        assert_eq!(ctx.pixel(5, 2), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn segment_clipping() {
        let bounds = ((-1.0, -1.0), (11.0, 11.0));
        assert_eq!(
            clip_segment((0.0, 5.0), (1_073_741_824.0, 5.0), bounds),
            Some(((0.0, 5.0), (11.0, 5.0)))
        );
        assert_eq!(clip_segment((20.0, 0.0), (30.0, 8.0), bounds), None);
        assert_eq!(
            clip_segment((2.0, 3.0), (4.0, 5.0), bounds),
            Some(((2.0, 3.0), (4.0, 5.0)))
        );
        assert_eq!(clip_segment((0.0, f64::NAN), (4.0, 5.0), bounds), None);
    }

    #[test]
    fn draw_image_composites_at_offset() {
        let mut ctx = RasterContext::new(10, 10);
        let sprite = RgbaImage::from_pixel(2, 2, RED);
        ctx.draw_image(&sprite, 3.0, 4.0);
        assert_eq!(ctx.pixel(3, 4), Some(RED));
        assert_eq!(ctx.pixel(4, 5), Some(RED));
        assert_eq!(ctx.pixel(5, 6), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn fill_text_records_run_with_current_state() {
        let mut ctx = RasterContext::new(10, 10);
        ctx.set_fill_style("red");
        ctx.set_font("12px serif");
        ctx.set_text_align(TextAlign::Right);
        ctx.fill_text("hello", 1.0, 2.0);

        let run = &ctx.texts()[0];
        assert_eq!(run.text, "hello");
        assert_eq!(run.font, "12px serif");
        assert_eq!(run.align, TextAlign::Right);
        assert_eq!(run.color, RED);
    }
}
