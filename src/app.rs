//! Bouncing-ball demo built on the runtime and the canvas view.

use crate::canvas::{CanvasMsg, DrawCommand, ImageCache, TextAlign};
use crate::runtime::{Cmd, Transition};
use crate::shutdown::ShutdownHandle;

const PALETTE: [&str; 5] = ["orange", "yellow", "cyan", "lime", "magenta"];
const NUDGE: f64 = 10.0;
const RADIUS: f64 = 16.0;
const SPEED: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Canvas(CanvasMsg),
    SpriteLoaded { ok: bool },
}

impl From<CanvasMsg> for Msg {
    fn from(msg: CanvasMsg) -> Self {
        Msg::Canvas(msg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: usize,
    pub ticks: u64,
    pub sprite_ready: bool,
    pub finished: bool,
}

/// Fixed parameters plus the handles the demo's commands need.
#[derive(Clone)]
pub struct Bouncer {
    pub width: f64,
    pub height: f64,
    /// Ticks before the demo asks to shut down; 0 runs until stopped.
    pub frames: u64,
    pub sprite: Option<String>,
    pub images: ImageCache,
    pub shutdown: ShutdownHandle,
}

impl Bouncer {
    /// Centered ball; starts the sprite load when one is configured.
    pub fn init(&self) -> Transition<Model, Msg> {
        let model = Model {
            x: self.width / 2.0,
            y: self.height / 2.0,
            vx: SPEED,
            vy: SPEED * 0.75,
            color: 0,
            ticks: 0,
            sprite_ready: false,
            finished: false,
        };

        match &self.sprite {
            Some(src) => Transition::with_cmd(model, self.preload(src.clone())),
            None => Transition::model(model),
        }
    }

    pub fn update(&self, msg: Msg, model: &Model) -> Transition<Model, Msg> {
        if model.finished {
            return Transition::model(model.clone());
        }

        match msg {
            Msg::Canvas(CanvasMsg::Tick) => {
                let next = self.step(model);
                if self.frames > 0 && next.ticks >= self.frames {
                    tracing::info!(ticks = next.ticks, "Frame limit reached");
                    self.finish(next)
                } else {
                    Transition::model(next)
                }
            }
            Msg::Canvas(CanvasMsg::KeyDown { key }) => match key.as_str() {
                "Escape" | "q" => self.finish(model.clone()),
                "ArrowUp" => Transition::model(self.moved(model, 0.0, -NUDGE)),
                "ArrowDown" => Transition::model(self.moved(model, 0.0, NUDGE)),
                "ArrowLeft" => Transition::model(self.moved(model, -NUDGE, 0.0)),
                "ArrowRight" => Transition::model(self.moved(model, NUDGE, 0.0)),
                _ => Transition::model(Model {
                    color: (model.color + 1) % PALETTE.len(),
                    ..model.clone()
                }),
            },
            Msg::Canvas(CanvasMsg::MouseDown { x, y }) => Transition::model(Model {
                x: self.clamp_x(x),
                y: self.clamp_y(y),
                ..model.clone()
            }),
            Msg::SpriteLoaded { ok } => Transition::model(Model {
                sprite_ready: ok,
                ..model.clone()
            }),
        }
    }

    pub fn draw(&self, model: &Model) -> Vec<DrawCommand> {
        let color = PALETTE[model.color % PALETTE.len()].to_string();
        let mut commands = vec![
            DrawCommand::clear("black"),
            DrawCommand::OutlinedRectangle {
                x: 1.0,
                y: 1.0,
                width: self.width - 2.0,
                height: self.height - 2.0,
                color: "gray".into(),
                line_width: 2.0,
            },
            DrawCommand::Line {
                x1: model.x,
                y1: model.y,
                x2: model.x + model.vx * 4.0,
                y2: model.y + model.vy * 4.0,
                color: color.clone(),
                line_width: 1.0,
            },
        ];

        match (&self.sprite, model.sprite_ready) {
            (Some(src), true) => {
                commands.push(DrawCommand::image(model.x - RADIUS, model.y - RADIUS, src.as_str()))
            }
            _ => commands.push(DrawCommand::SolidCircle {
                x: model.x,
                y: model.y,
                radius: RADIUS,
                color: color.clone(),
            }),
        }

        commands.push(DrawCommand::OutlinedCircle {
            x: model.x,
            y: model.y,
            radius: RADIUS + 3.0,
            color,
            line_width: 1.0,
        });
        commands.push(DrawCommand::Text {
            x: 8.0,
            y: 20.0,
            text: format!("tick {}", model.ticks),
            color: "white".into(),
            font_size: 14,
            font: "monospace".into(),
            text_align: TextAlign::Left,
        });
        commands
    }

    fn preload(&self, src: String) -> Cmd<Msg> {
        let images = self.images.clone();
        Cmd::of_sub(move |dispatch| async move {
            let ok = match images.load(&src).await {
                Ok(_) => true,
                Err(err) => {
                    tracing::warn!(error = %err, "Sprite unavailable, drawing a circle");
                    false
                }
            };
            dispatch.dispatch(Msg::SpriteLoaded { ok });
        })
    }

    fn finish(&self, model: Model) -> Transition<Model, Msg> {
        let shutdown = self.shutdown.clone();
        Transition::with_cmd(
            Model {
                finished: true,
                ..model
            },
            Cmd::of_sub(move |_| async move { shutdown.signal() }),
        )
    }

    fn step(&self, model: &Model) -> Model {
        let (x, vx) = bounce(model.x + model.vx, model.vx, RADIUS, self.width - RADIUS);
        let (y, vy) = bounce(model.y + model.vy, model.vy, RADIUS, self.height - RADIUS);
        Model {
            x,
            y,
            vx,
            vy,
            ticks: model.ticks + 1,
            ..model.clone()
        }
    }

    fn moved(&self, model: &Model, dx: f64, dy: f64) -> Model {
        Model {
            x: self.clamp_x(model.x + dx),
            y: self.clamp_y(model.y + dy),
            ..model.clone()
        }
    }

    fn clamp_x(&self, x: f64) -> f64 {
        x.clamp(RADIUS, (self.width - RADIUS).max(RADIUS))
    }

    fn clamp_y(&self, y: f64) -> f64 {
        y.clamp(RADIUS, (self.height - RADIUS).max(RADIUS))
    }
}

/// Reflect off `[min, max]`.
fn bounce(pos: f64, velocity: f64, min: f64, max: f64) -> (f64, f64) {
    if max <= min {
        (min, 0.0)
    } else if pos < min {
        (min + (min - pos), velocity.abs())
    } else if pos > max {
        (max - (pos - max), -velocity.abs())
    } else {
        (pos, velocity)
    }
}
