use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use mvu_canvas::app::{Bouncer, Model, Msg};
use mvu_canvas::canvas::{canvas_view, CanvasEnv, ImageCache, SourceLoader};
use mvu_canvas::cli::Cli;
use mvu_canvas::config::Config;
use mvu_canvas::input::{InputSource, TerminalInput};
use mvu_canvas::logging::init_tracing;
use mvu_canvas::runtime::Runtime;
use mvu_canvas::shutdown::Shutdown;
use mvu_canvas::vdom::{Document, DomReconciler};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;
    cli.apply(&mut config);
    config.validate().context("invalid settings")?;

    let shutdown = Shutdown::new();
    let ctrl_c = shutdown.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.signal();
        }
    });

    let document = Arc::new(Document::raster());
    let images = ImageCache::new(SourceLoader::new(config.demo.asset_root.clone()));
    let input = InputSource::new();
    let terminal = if cli.interactive {
        Some(
            TerminalInput::spawn(input.clone(), shutdown.handle())
                .context("enabling terminal input")?,
        )
    } else {
        None
    };

    let app = Bouncer {
        width: config.canvas.width as f64,
        height: config.canvas.height as f64,
        frames: config.demo.frames,
        sprite: config.demo.sprite.clone(),
        images: images.clone(),
        shutdown: shutdown.handle(),
    };
    let env = CanvasEnv {
        document: Arc::clone(&document),
        images,
        input,
    };

    let drawer = app.clone();
    let view = canvas_view::<Model, Msg, _>(config.canvas.clone(), env, move |model| {
        drawer.draw(model)
    });
    let updater = app.clone();
    let mut runtime = Runtime::start(
        DomReconciler::new(Arc::clone(&document)),
        app.init(),
        move |msg, model: &Model| updater.update(msg, model),
        view,
    );

    tracing::info!(
        width = config.canvas.width,
        height = config.canvas.height,
        fps = config.canvas.fps,
        frames = config.demo.frames,
        "Running"
    );
    runtime.run(shutdown.handle()).await;

    if let Some(terminal) = terminal {
        terminal.join().await;
    }

    let frame = document
        .snapshot(&config.canvas.surface_id)
        .context("capturing final frame")?;
    frame
        .save(&config.demo.output)
        .with_context(|| format!("writing {}", config.demo.output.display()))?;
    tracing::info!(
        path = %config.demo.output.display(),
        ticks = runtime.model().ticks,
        stats = ?runtime.stats(),
        "Frame written"
    );

    runtime.teardown();
    Ok(())
}
