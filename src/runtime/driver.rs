use std::collections::VecDeque;
use std::task::{Context, Poll};

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;

use crate::shutdown::ShutdownHandle;
use crate::vdom::Reconciler;

use super::cmd::Cmd;
use super::dispatch::{Dispatch, Envelope};
use super::transition::Transition;

type UpdateFn<M, Msg> = Box<dyn FnMut(Msg, &M) -> Transition<M, Msg>>;
type ViewFn<M, Msg, N> = Box<dyn Fn(&M, &Dispatch<Msg>) -> N>;

/// Counters describing what the runtime has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Messages applied through `update`.
    pub messages: u64,
    /// Drains that ended in a commit (the initial mount is not one).
    pub drains: u64,
    /// Calls to `view` followed by a reconcile, including the initial mount.
    pub renders: u64,
    pub commands_started: u64,
    pub commands_completed: u64,
}

/// Owns the model and drives message → update → render.
///
/// All work happens on the task that polls [`run`](Runtime::run) or
/// [`run_until_idle`](Runtime::run_until_idle); commands are polled there
/// too, so neither the model nor commands need to be `Send`.
pub struct Runtime<M, Msg, R: Reconciler> {
    model: M,
    queue: VecDeque<Msg>,
    inbox: mpsc::UnboundedReceiver<Envelope<Msg>>,
    dispatch: Dispatch<Msg>,
    update: UpdateFn<M, Msg>,
    view: ViewFn<M, Msg, R::Node>,
    reconciler: R,
    committed: Option<R::Committed>,
    commands: FuturesUnordered<LocalBoxFuture<'static, ()>>,
    stats: RuntimeStats,
}

impl<M, Msg, R> Runtime<M, Msg, R>
where
    M: 'static,
    Msg: 'static,
    R: Reconciler,
{
    /// Start a runtime whose `update` may return commands.
    ///
    /// A command carried by `initial` is started before the first render,
    /// which happens before this returns.
    pub fn start<U, V>(reconciler: R, initial: Transition<M, Msg>, update: U, view: V) -> Self
    where
        U: FnMut(Msg, &M) -> Transition<M, Msg> + 'static,
        V: Fn(&M, &Dispatch<Msg>) -> R::Node + 'static,
    {
        let (dispatch, inbox) = Dispatch::channel();
        let (model, cmd) = initial.into_parts();
        let mut runtime = Self {
            model,
            queue: VecDeque::new(),
            inbox,
            dispatch,
            update: Box::new(update),
            view: Box::new(view),
            reconciler,
            committed: None,
            commands: FuturesUnordered::new(),
            stats: RuntimeStats::default(),
        };

        if let Some(cmd) = cmd {
            runtime.start_command(cmd);
        }
        runtime.commit();
        runtime
    }

    /// Start a runtime whose `update` always returns a bare model.
    pub fn start_simple<U, V>(reconciler: R, model: M, mut update: U, view: V) -> Self
    where
        U: FnMut(Msg, &M) -> M + 'static,
        V: Fn(&M, &Dispatch<Msg>) -> R::Node + 'static,
    {
        Self::start(
            reconciler,
            Transition::Model(model),
            move |msg, model: &M| Transition::Model(update(msg, model)),
            view,
        )
    }

    pub fn dispatch(&self) -> Dispatch<Msg> {
        self.dispatch.clone()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn committed(&self) -> Option<&R::Committed> {
        self.committed.as_ref()
    }

    pub fn reconciler(&self) -> &R {
        &self.reconciler
    }

    pub fn stats(&self) -> RuntimeStats {
        self.stats
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Drive the loop until `shutdown` is signalled.
    pub async fn run(&mut self, shutdown: ShutdownHandle) {
        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    tracing::debug!(stats = ?self.stats, "Runtime stopping");
                    break;
                }
                envelope = self.inbox.recv() => match envelope {
                    Some(envelope) => {
                        self.accept(envelope);
                        self.drain(false);
                    }
                    None => break,
                },
                Some(()) = self.commands.next(), if !self.commands.is_empty() => {
                    self.complete_command();
                }
            }
        }
    }

    /// Process everything already queued and wait for in-flight commands,
    /// including whatever they dispatch, until nothing is left.
    pub async fn run_until_idle(&mut self) {
        loop {
            if self.drain(false) {
                continue;
            }
            if self.commands.is_empty() {
                break;
            }
            tokio::select! {
                envelope = self.inbox.recv() => {
                    if let Some(envelope) = envelope {
                        self.accept(envelope);
                    }
                }
                Some(()) = self.commands.next() => {
                    self.complete_command();
                }
            }
        }
    }

    /// Release the committed tree (and every mount guard in it).
    pub fn teardown(mut self) {
        if let Some(committed) = self.committed.take() {
            self.reconciler.unmount(committed);
        }
    }

    fn accept(&mut self, envelope: Envelope<Msg>) {
        match envelope {
            Envelope::Message(msg) => self.queue.push_back(msg),
            Envelope::Deferred(task) => task(&self.dispatch),
        }
    }

    /// Apply queued messages until none remain, then commit once.
    ///
    /// Messages that arrive while draining join the same drain. Returns
    /// whether anything was taken from the inbox or queue.
    fn drain(&mut self, force_render: bool) -> bool {
        let mut progressed = false;
        let mut dirty = force_render;
        loop {
            while let Ok(envelope) = self.inbox.try_recv() {
                progressed = true;
                self.accept(envelope);
            }
            let Some(msg) = self.queue.pop_front() else {
                break;
            };
            progressed = true;
            dirty = true;
            self.stats.messages += 1;

            let (model, cmd) = (self.update)(msg, &self.model).into_parts();
            self.model = model;
            if let Some(cmd) = cmd {
                self.start_command(cmd);
            }
        }

        if dirty {
            self.stats.drains += 1;
            self.commit();
        }
        progressed
    }

    /// Run the command up to its first suspension point. Whatever it
    /// dispatches before suspending joins the drain in progress.
    fn start_command(&mut self, cmd: Cmd<Msg>) {
        self.stats.commands_started += 1;
        let mut command = cmd.run(self.dispatch.clone());
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match command.poll_unpin(&mut cx) {
            Poll::Ready(()) => {
                self.stats.commands_completed += 1;
                tracing::debug!(in_flight = self.commands.len(), "Command finished on start");
            }
            Poll::Pending => {
                self.commands.push(command);
                tracing::debug!(in_flight = self.commands.len(), "Command suspended");
            }
        }
    }

    fn complete_command(&mut self) {
        self.stats.commands_completed += 1;
        tracing::debug!(in_flight = self.commands.len(), "Command completed");
        self.drain(true);
    }

    fn commit(&mut self) {
        let node = (self.view)(&self.model, &self.dispatch);
        let committed = match self.committed.take() {
            Some(previous) => self.reconciler.patch(previous, node),
            None => self.reconciler.mount(node),
        };
        self.committed = Some(committed);
        self.stats.renders += 1;
        tracing::trace!(renders = self.stats.renders, "Committed");
    }
}
