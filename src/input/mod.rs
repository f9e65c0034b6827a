//! Global input event source (the host's keydown/mousedown stream).

mod terminal;

pub use terminal::{key_name, translate, TerminalInput};

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Browser-style key name: `"a"`, `"Enter"`, `"ArrowUp"`, ...
    KeyDown { key: String },
    MouseDown { x: f64, y: f64 },
}

type Callback = Arc<dyn Fn(&InputEvent) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

/// Broadcasts input events to registered listeners.
#[derive(Clone, Default)]
pub struct InputSource {
    listeners: Arc<Mutex<Listeners>>,
}

impl InputSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`. It stays registered until the returned
    /// [`Listener`] is dropped.
    pub fn listen<F>(&self, callback: F) -> Listener
    where
        F: Fn(&InputEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(callback)));
        Listener {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn emit(&self, event: InputEvent) {
        // Callbacks run without the lock held so they may register or drop
        // listeners themselves.
        let callbacks: Vec<Callback> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }
}

/// Registration guard returned by [`InputSource::listen`].
pub struct Listener {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
