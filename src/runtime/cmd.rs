//! Commands: deferred asynchronous work that can feed messages back.

use std::fmt;
use std::future::Future;

use futures::future::{join_all, LocalBoxFuture};
use futures::FutureExt;

use super::dispatch::Dispatch;

type Sub<Msg> = Box<dyn FnOnce(Dispatch<Msg>) -> LocalBoxFuture<'static, ()>>;

/// A unit of asynchronous work, run at most once.
///
/// The runtime invokes `run` with its own dispatch handle, polls the result
/// once straight away, and only awaits completion to schedule the next
/// drain; success or failure of the work is the command's own business.
pub struct Cmd<Msg> {
    sub: Sub<Msg>,
}

impl<Msg: 'static> Cmd<Msg> {
    /// Command from an async subscription that receives the dispatch handle.
    pub fn of_sub<F, Fut>(sub: F) -> Self
    where
        F: FnOnce(Dispatch<Msg>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        Self {
            sub: Box::new(move |dispatch| sub(dispatch).boxed_local()),
        }
    }

    /// Command that dispatches `msg` once.
    pub fn of_msg(msg: Msg) -> Self {
        Self::of_sub(move |dispatch: Dispatch<Msg>| async move { dispatch.dispatch(msg) })
    }

    /// Command running all of `cmds` concurrently; completes when all have.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd<Msg>>) -> Self {
        let cmds: Vec<Cmd<Msg>> = cmds.into_iter().collect();
        Self::of_sub(move |dispatch: Dispatch<Msg>| async move {
            join_all(cmds.into_iter().map(|cmd| cmd.run(dispatch.clone()))).await;
        })
    }

    /// Start the work. The returned future completes when the work does.
    pub fn run(self, dispatch: Dispatch<Msg>) -> LocalBoxFuture<'static, ()> {
        (self.sub)(dispatch)
    }
}

impl<Msg> fmt::Debug for Cmd<Msg> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cmd { .. }")
    }
}
