use std::sync::Arc;

use mvu_canvas::runtime::{Dispatch, Runtime};
use mvu_canvas::vdom::{Document, DomReconciler, VNode};

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Noop,
    Rename(String),
}

fn update(msg: Msg, title: &String) -> String {
    match msg {
        Msg::Noop => title.clone(),
        Msg::Rename(title) => title,
    }
}

fn view(title: &String, _dispatch: &Dispatch<Msg>) -> VNode {
    VNode::new("main")
        .prop("title", title.as_str())
        .children([VNode::new("h1").prop("text", title.as_str()), VNode::new("p")])
}

#[tokio::test]
async fn unchanged_model_commits_identical_tree() {
    let document = Arc::new(Document::raster());
    let mut runtime = Runtime::start_simple(
        DomReconciler::new(document),
        "hello".to_string(),
        update,
        view,
    );
    let before = format!("{:?}", runtime.committed());

    runtime.dispatch().dispatch(Msg::Noop);
    runtime.run_until_idle().await;

    assert_eq!(runtime.stats().renders, 2);
    assert_eq!(format!("{:?}", runtime.committed()), before);
}

#[tokio::test]
async fn changed_model_updates_props_in_place() {
    let document = Arc::new(Document::raster());
    let mut runtime = Runtime::start_simple(
        DomReconciler::new(document),
        "hello".to_string(),
        update,
        view,
    );

    runtime.dispatch().dispatch(Msg::Rename("bye".into()));
    runtime.run_until_idle().await;

    let root = runtime.committed().expect("committed tree");
    assert_eq!(root.props()["title"].as_str(), Some("bye"));
    assert_eq!(root.children()[0].props()["text"].as_str(), Some("bye"));
    assert_eq!(root.children().len(), 2);
}
