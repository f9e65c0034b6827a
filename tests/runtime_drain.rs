mod common;

use std::sync::Arc;

use common::StringReconciler;
use mvu_canvas::runtime::{Dispatch, Runtime};
use mvu_canvas::shutdown::Shutdown;
use parking_lot::Mutex;

fn summary(model: &Vec<i32>, _dispatch: &Dispatch<i32>) -> String {
    format!("{:?}", model)
}

fn push(msg: i32, model: &Vec<i32>) -> Vec<i32> {
    let mut next = model.clone();
    next.push(msg);
    next
}

#[tokio::test]
async fn drained_model_is_left_fold_in_arrival_order() {
    let reconciler = StringReconciler::default();
    let mut runtime = Runtime::start_simple(reconciler.clone(), Vec::new(), push, summary);

    let dispatch = runtime.dispatch();
    for n in [3, 1, 4, 1, 5] {
        dispatch.dispatch(n);
    }
    runtime.run_until_idle().await;

    let expected = [3, 1, 4, 1, 5].into_iter().fold(Vec::new(), |m, n| push(n, &m));
    assert_eq!(runtime.model(), &expected);
    assert_eq!(reconciler.commits(), vec!["[]".to_string(), format!("{:?}", expected)]);
}

#[tokio::test]
async fn dispatch_does_not_process_synchronously() {
    let mut runtime = Runtime::start_simple(StringReconciler::default(), Vec::new(), push, summary);

    runtime.dispatch().dispatch(7);
    assert!(runtime.model().is_empty());
    assert_eq!(runtime.stats().messages, 0);

    runtime.run_until_idle().await;
    assert_eq!(runtime.model(), &vec![7]);
}

#[tokio::test]
async fn messages_dispatched_while_draining_join_the_same_drain() {
    let handle: Arc<Mutex<Option<Dispatch<i32>>>> = Arc::new(Mutex::new(None));
    let reentrant = Arc::clone(&handle);
    let reconciler = StringReconciler::default();

    let mut runtime = Runtime::start_simple(
        reconciler.clone(),
        Vec::new(),
        move |msg, model: &Vec<i32>| {
            if msg < 3 {
                if let Some(dispatch) = reentrant.lock().as_ref() {
                    dispatch.dispatch(msg + 1);
                }
            }
            push(msg, model)
        },
        summary,
    );
    *handle.lock() = Some(runtime.dispatch());

    runtime.dispatch().dispatch(1);
    runtime.run_until_idle().await;

    assert_eq!(runtime.model(), &vec![1, 2, 3]);
    let stats = runtime.stats();
    assert_eq!(stats.messages, 3);
    assert_eq!(stats.drains, 1);
    // initial mount + one commit for the whole drain
    assert_eq!(reconciler.commits().len(), 2);
}

#[tokio::test]
async fn view_receives_a_working_dispatch() {
    let reconciler = StringReconciler::default();
    let mut runtime = Runtime::start_simple(
        reconciler.clone(),
        Vec::new(),
        push,
        |model: &Vec<i32>, dispatch: &Dispatch<i32>| {
            // Render-time dispatch lands in a later drain.
            if model.is_empty() {
                dispatch.dispatch(42);
            }
            format!("{:?}", model)
        },
    );

    runtime.run_until_idle().await;

    assert_eq!(runtime.model(), &vec![42]);
    assert_eq!(reconciler.commits(), vec!["[]".to_string(), "[42]".to_string()]);
}

#[tokio::test]
async fn run_stops_on_shutdown() {
    let shutdown = Shutdown::new();
    let mut runtime = Runtime::start_simple(StringReconciler::default(), Vec::new(), push, summary);

    runtime.dispatch().dispatch(1);
    runtime.dispatch().dispatch(2);
    let stopper = shutdown.handle();
    runtime.dispatch().defer(move |_| stopper.signal());

    runtime.run(shutdown.handle()).await;

    assert_eq!(runtime.model(), &vec![1, 2]);
    assert!(shutdown.is_shutting_down());
}
