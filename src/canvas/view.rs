//! The canvas view: draws a model's commands onto a mounted surface and
//! wires input and a frame timer into the dispatch channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::command::{CanvasMsg, DrawCommand};
use super::images::ImageCache;
use super::paint::paint;
use crate::config::CanvasConfig;
use crate::input::{InputEvent, InputSource, Listener};
use crate::runtime::Dispatch;
use crate::vdom::{Document, MountGuard, VNode};

const MIN_FRAME_PERIOD: Duration = Duration::from_millis(1);

/// Host services a canvas draws into and listens to.
#[derive(Clone)]
pub struct CanvasEnv {
    pub document: Arc<Document>,
    pub images: ImageCache,
    pub input: InputSource,
}

/// Render function for a fixed-size canvas.
pub struct CanvasView<M> {
    config: CanvasConfig,
    env: CanvasEnv,
    to_draw: Box<dyn Fn(&M) -> Vec<DrawCommand>>,
}

impl<M> CanvasView<M> {
    pub fn new<F>(config: CanvasConfig, env: CanvasEnv, to_draw: F) -> Self
    where
        F: Fn(&M) -> Vec<DrawCommand> + 'static,
    {
        Self {
            config,
            env,
            to_draw: Box::new(to_draw),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Draw `model` and describe the canvas element.
    ///
    /// When the surface is not mounted yet (first render of the element),
    /// the draw is retried on following loop turns, at most
    /// `max_mount_retries` times.
    pub fn render<Msg>(&self, model: &M, dispatch: &Dispatch<Msg>) -> VNode
    where
        Msg: From<CanvasMsg> + Send + 'static,
    {
        let job = DrawJob {
            document: Arc::clone(&self.env.document),
            images: self.env.images.clone(),
            surface_id: self.config.surface_id.clone(),
            width: self.config.width as f64,
            height: self.config.height as f64,
            commands: (self.to_draw)(model),
            retries_left: self.config.max_mount_retries,
        };
        job.run_or_defer(dispatch);
        self.element(dispatch)
    }

    fn element<Msg>(&self, dispatch: &Dispatch<Msg>) -> VNode
    where
        Msg: From<CanvasMsg> + Send + 'static,
    {
        let dispatch = dispatch.clone();
        let input = self.env.input.clone();
        let fps = self.config.fps;
        let id = self.config.surface_id.clone();

        VNode::new("canvas")
            .prop("id", self.config.surface_id.as_str())
            .prop("width", self.config.width)
            .prop("height", self.config.height)
            .on_create(move || -> MountGuard {
                Box::new(CanvasResources::acquire(&id, &input, &dispatch, fps))
            })
    }
}

/// Build a render function for [`Runtime`](crate::runtime::Runtime).
pub fn canvas_view<M, Msg, F>(
    config: CanvasConfig,
    env: CanvasEnv,
    to_draw: F,
) -> impl Fn(&M, &Dispatch<Msg>) -> VNode
where
    F: Fn(&M) -> Vec<DrawCommand> + 'static,
    Msg: From<CanvasMsg> + Send + 'static,
{
    let view = CanvasView::new(config, env, to_draw);
    move |model: &M, dispatch: &Dispatch<Msg>| view.render(model, dispatch)
}

struct DrawJob {
    document: Arc<Document>,
    images: ImageCache,
    surface_id: String,
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
    retries_left: u32,
}

impl DrawJob {
    fn run_or_defer<Msg: Send + 'static>(mut self, dispatch: &Dispatch<Msg>) {
        match self.document.surface(&self.surface_id) {
            Some(surface) => {
                let mut surface = surface.lock();
                paint(
                    surface.context_mut(),
                    &self.commands,
                    self.width,
                    self.height,
                    &self.images,
                );
            }
            None if self.retries_left > 0 => {
                self.retries_left -= 1;
                tracing::debug!(
                    id = %self.surface_id,
                    retries_left = self.retries_left,
                    "Surface not mounted yet, retrying next turn"
                );
                dispatch.defer(move |dispatch| self.run_or_defer(dispatch));
            }
            None => {
                tracing::warn!(id = %self.surface_id, "Surface never mounted, frame dropped");
            }
        }
    }
}

/// Listeners and frame timer owned by one mounted canvas.
struct CanvasResources {
    id: String,
    _key_down: Listener,
    _mouse_down: Listener,
    timer: Option<JoinHandle<()>>,
}

impl CanvasResources {
    fn acquire<Msg>(id: &str, input: &InputSource, dispatch: &Dispatch<Msg>, fps: f64) -> Self
    where
        Msg: From<CanvasMsg> + Send + 'static,
    {
        let keys = dispatch.clone();
        let key_down = input.listen(move |event| {
            if let InputEvent::KeyDown { key } = event {
                keys.dispatch(CanvasMsg::KeyDown { key: key.clone() });
            }
        });

        let clicks = dispatch.clone();
        let mouse_down = input.listen(move |event| {
            if let InputEvent::MouseDown { x, y } = event {
                clicks.dispatch(CanvasMsg::MouseDown { x: *x, y: *y });
            }
        });

        let timer = spawn_frame_timer(id, dispatch.clone(), fps);
        tracing::debug!(id, fps, "Canvas mounted");

        Self {
            id: id.to_string(),
            _key_down: key_down,
            _mouse_down: mouse_down,
            timer,
        }
    }
}

impl Drop for CanvasResources {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        tracing::debug!(id = %self.id, "Canvas resources released");
    }
}

/// Time between ticks, never shorter than a millisecond. `None` when `fps`
/// is not positive or the period does not fit a `Duration`.
fn frame_period(fps: f64) -> Option<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        return None;
    }
    let period = Duration::try_from_secs_f64(1.0 / fps).ok()?;
    Some(period.max(MIN_FRAME_PERIOD))
}

/// Dispatch `Tick` every `1000 / fps` ms, skipping ticks the loop fell
/// behind on. The first tick comes one period after mount.
fn spawn_frame_timer<Msg>(id: &str, dispatch: Dispatch<Msg>, fps: f64) -> Option<JoinHandle<()>>
where
    Msg: From<CanvasMsg> + Send + 'static,
{
    let Some(period) = frame_period(fps) else {
        tracing::warn!(id, fps, "Invalid frame rate, timer disabled");
        return None;
    };
    let handle = match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle,
        Err(_) => {
            tracing::warn!(id, "No async runtime, timer disabled");
            return None;
        }
    };

    Some(handle.spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await;
        loop {
            interval.tick().await;
            if dispatch.is_closed() {
                break;
            }
            dispatch.dispatch(CanvasMsg::Tick);
        }
    }))
}
