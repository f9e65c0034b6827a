mod common;

use std::sync::Arc;

use common::{canvas_config, png_data_uri, raster_env, solid_image};
use image::Rgba;
use mvu_canvas::app::{Bouncer, Model, Msg};
use mvu_canvas::canvas::canvas_view;
use mvu_canvas::input::InputEvent;
use mvu_canvas::runtime::Runtime;
use mvu_canvas::shutdown::Shutdown;
use mvu_canvas::vdom::DomReconciler;

#[tokio::test(start_paused = true)]
async fn demo_stops_itself_after_frame_limit() {
    let shutdown = Shutdown::new();
    let env = raster_env();
    let document = Arc::clone(&env.document);
    let app = Bouncer {
        width: 64.0,
        height: 48.0,
        frames: 3,
        sprite: None,
        images: env.images.clone(),
        shutdown: shutdown.handle(),
    };

    let drawer = app.clone();
    let view = canvas_view::<Model, Msg, _>(canvas_config(64, 48), env, move |model| {
        drawer.draw(model)
    });
    let updater = app.clone();
    let mut runtime = Runtime::start(
        DomReconciler::new(Arc::clone(&document)),
        app.init(),
        move |msg, model: &Model| updater.update(msg, model),
        view,
    );

    runtime.run(shutdown.handle()).await;

    assert!(shutdown.is_shutting_down());
    assert_eq!(runtime.model().ticks, 3);
    assert!(runtime.model().finished);

    let frame = document.snapshot("test-canvas").expect("snapshot");
    assert_eq!(frame.dimensions(), (64, 48));
    assert_eq!(*frame.get_pixel(8, 40), Rgba([0, 0, 0, 255]));
    runtime.teardown();
}

#[tokio::test(start_paused = true)]
async fn escape_key_ends_the_demo() {
    let shutdown = Shutdown::new();
    let env = raster_env();
    let input = env.input.clone();
    let app = Bouncer {
        width: 64.0,
        height: 48.0,
        frames: 0,
        sprite: None,
        images: env.images.clone(),
        shutdown: shutdown.handle(),
    };

    let drawer = app.clone();
    let view = canvas_view::<Model, Msg, _>(canvas_config(64, 48), env.clone(), move |model| {
        drawer.draw(model)
    });
    let updater = app.clone();
    let mut runtime = Runtime::start(
        DomReconciler::new(Arc::clone(&env.document)),
        app.init(),
        move |msg, model: &Model| updater.update(msg, model),
        view,
    );

    input.emit(InputEvent::KeyDown { key: "Escape".into() });
    runtime.run(shutdown.handle()).await;

    assert!(runtime.model().finished);
}

#[tokio::test(start_paused = true)]
async fn sprite_is_preloaded_by_initial_command() {
    let shutdown = Shutdown::new();
    let env = raster_env();
    let sprite = png_data_uri(&solid_image(4, 4, [0, 255, 0, 255]));
    let app = Bouncer {
        width: 64.0,
        height: 48.0,
        frames: 0,
        sprite: Some(sprite.clone()),
        images: env.images.clone(),
        shutdown: shutdown.handle(),
    };

    let drawer = app.clone();
    let view = canvas_view::<Model, Msg, _>(canvas_config(64, 48), env.clone(), move |model| {
        drawer.draw(model)
    });
    let updater = app.clone();
    let mut runtime = Runtime::start(
        DomReconciler::new(Arc::clone(&env.document)),
        app.init(),
        move |msg, model: &Model| updater.update(msg, model),
        view,
    );
    assert_eq!(runtime.stats().commands_started, 1);

    runtime.run_until_idle().await;

    assert!(runtime.model().sprite_ready);
    assert!(env.images.is_loaded(&sprite));
}
