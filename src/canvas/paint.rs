//! Translation of [`DrawCommand`]s into drawing-context calls.

use std::f64::consts::TAU;

use super::command::DrawCommand;
use super::context::{DrawingContext, DEFAULT_LINE_WIDTH, DEFAULT_TEXT_ALIGN};
use super::images::ImageCache;

/// Apply `commands` in order to `ctx`, a surface of `width` x `height`.
///
/// Each op runs to completion before the next starts, and any style an op
/// sets is restored right after it so nothing leaks into later ops.
pub fn paint(
    ctx: &mut dyn DrawingContext,
    commands: &[DrawCommand],
    width: f64,
    height: f64,
    images: &ImageCache,
) {
    for command in commands {
        tracing::trace!(op = command.tag(), "Draw");
        paint_one(ctx, command, width, height, images);
    }
}

fn paint_one(
    ctx: &mut dyn DrawingContext,
    command: &DrawCommand,
    surface_width: f64,
    surface_height: f64,
    images: &ImageCache,
) {
    match command {
        DrawCommand::NullElement => {}

        DrawCommand::Clear { color } => {
            ctx.set_fill_style(color);
            ctx.fill_rect(0.0, 0.0, surface_width, surface_height);
            ctx.set_fill_style("");
        }

        DrawCommand::Text {
            x,
            y,
            text,
            color,
            font_size,
            font,
            text_align,
        } => {
            ctx.set_fill_style(color);
            ctx.set_text_align(*text_align);
            ctx.set_font(&format!("{}px {}", font_size, font));
            ctx.fill_text(text, *x, *y);
            ctx.set_fill_style("");
            ctx.set_text_align(DEFAULT_TEXT_ALIGN);
            ctx.set_font("");
        }

        DrawCommand::SolidCircle {
            x,
            y,
            radius,
            color,
        } => {
            ctx.set_fill_style(color);
            ctx.begin_path();
            ctx.arc(*x, *y, *radius, 0.0, TAU);
            ctx.fill();
            ctx.close_path();
            ctx.set_fill_style("");
        }

        DrawCommand::OutlinedCircle {
            x,
            y,
            radius,
            color,
            line_width,
        } => {
            ctx.set_stroke_style(color);
            ctx.set_line_width(*line_width);
            ctx.begin_path();
            ctx.arc(*x, *y, *radius, 0.0, TAU);
            ctx.close_path();
            ctx.stroke();
            ctx.set_stroke_style("");
            ctx.set_line_width(DEFAULT_LINE_WIDTH);
        }

        DrawCommand::SolidRectangle {
            x,
            y,
            width,
            height,
            color,
        } => {
            ctx.set_fill_style(color);
            ctx.fill_rect(*x, *y, *width, *height);
            ctx.set_fill_style("");
        }

        DrawCommand::OutlinedRectangle {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => {
            ctx.set_stroke_style(color);
            ctx.set_line_width(*line_width);
            ctx.stroke_rect(*x, *y, *width, *height);
            ctx.set_stroke_style("");
            ctx.set_line_width(DEFAULT_LINE_WIDTH);
        }

        DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            line_width,
        } => {
            ctx.set_stroke_style(color);
            ctx.set_line_width(*line_width);
            ctx.begin_path();
            ctx.move_to(*x1, *y1);
            ctx.line_to(*x2, *y2);
            ctx.stroke();
            ctx.close_path();
            ctx.set_stroke_style("");
            ctx.set_line_width(DEFAULT_LINE_WIDTH);
        }

        DrawCommand::Image { x, y, src } => match images.get(src) {
            Some(image) => ctx.draw_image(&image, *x, *y),
            None => tracing::trace!(src = %src, "Image not loaded yet, skipped this frame"),
        },
    }
}
