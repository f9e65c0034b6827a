//! The dispatch channel shared by views, commands and input sources.

use tokio::sync::mpsc;

/// Closure run on a later turn of the runtime loop.
pub type Task<Msg> = Box<dyn FnOnce(&Dispatch<Msg>) + Send>;

pub(crate) enum Envelope<Msg> {
    Message(Msg),
    Deferred(Task<Msg>),
}

/// Handle for feeding messages into a running [`Runtime`](super::Runtime).
///
/// Sending only appends to the runtime's inbox; the drain happens on a later
/// turn of the loop, so dispatching from inside `update`, `view` or a command
/// never reenters the runtime.
pub struct Dispatch<Msg> {
    tx: mpsc::UnboundedSender<Envelope<Msg>>,
}

impl<Msg> Clone for Dispatch<Msg> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Msg> Dispatch<Msg> {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<Envelope<Msg>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue a message.
    pub fn dispatch(&self, msg: impl Into<Msg>) {
        if self.tx.send(Envelope::Message(msg.into())).is_err() {
            tracing::trace!("Runtime gone, message dropped");
        }
    }

    /// Run `task` on the next turn of the runtime loop.
    pub fn defer<F>(&self, task: F)
    where
        F: FnOnce(&Dispatch<Msg>) + Send + 'static,
    {
        if self.tx.send(Envelope::Deferred(Box::new(task))).is_err() {
            tracing::trace!("Runtime gone, deferred task dropped");
        }
    }

    /// True once the runtime has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
