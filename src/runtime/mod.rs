//! Model-View-Update runtime with effectful commands.
//!
//! # Architecture
//!
//! ```text
//! Msg ──→ queue ──→ update ──→ Model ──→ view ──→ reconcile
//!  ↑                  │                    │
//!  │                  └──→ Cmd ──(async)───┤
//!  └───────────────── dispatch ←───────────┘
//! ```
//!
//! - **Model**: the complete application state, owned by the [`Runtime`]
//! - **Msg**: an event that may provoke a transition
//! - **update**: `(Msg, &Model) -> Transition`, the only place models change
//! - **Cmd**: deferred async work that may dispatch further messages
//!
//! Dispatching never processes a message on the spot. The runtime drains its
//! queue on the next turn of its loop, applying `update` in arrival order
//! and rendering once when the queue is empty. A command starts as soon as
//! `update` returns it, so messages it dispatches before its first await
//! land in the drain that produced it.

mod cmd;
mod dispatch;
mod driver;
mod transition;

pub use cmd::Cmd;
pub use dispatch::{Dispatch, Task};
pub use driver::{Runtime, RuntimeStats};
pub use transition::Transition;
