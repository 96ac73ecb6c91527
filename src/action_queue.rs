//! Deferred actions handed from the UI thread to the render thread
//!
//! The UI thread appends, the render thread drains everything once per
//! frame. Draining swaps the buffer out under the lock and runs the actions
//! with the lock released, so an action may queue further work; that work
//! runs on the next drain.
//!
//! Once the consumer is gone the queue is closed: pending actions are
//! dropped and later submissions are rejected.

use parking_lot::Mutex;
use std::fmt;
use std::mem;

/// A callback run exactly once on the render thread.
pub type Action<C> = Box<dyn FnOnce(&mut C) + Send + 'static>;

struct Pending<C> {
    actions: Vec<Action<C>>,
    closed: bool,
}

pub struct ActionQueue<C> {
    pending: Mutex<Pending<C>>,
}

impl<C> ActionQueue<C> {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Pending {
                actions: Vec::new(),
                closed: false,
            }),
        }
    }

    /// Append an action at the tail. Returns `false` and drops the action
    /// when the queue is closed.
    pub fn submit<F>(&self, action: F) -> bool
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if pending.closed {
            drop(pending);
            log::warn!("render queue closed, dropping action");
            return false;
        }
        pending.actions.push(Box::new(action));
        true
    }

    /// Run every action queued so far in submission order.
    /// Returns how many ran.
    pub fn drain(&self, ctx: &mut C) -> usize {
        let actions = mem::take(&mut self.pending.lock().actions);
        let count = actions.len();
        for action in actions {
            action(ctx);
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.lock().actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().actions.is_empty()
    }

    /// Drop queued actions without running them.
    pub fn clear(&self) {
        let actions = mem::take(&mut self.pending.lock().actions);
        drop(actions);
    }

    /// Drop queued actions and reject every later submission.
    pub fn close(&self) {
        let actions = {
            let mut pending = self.pending.lock();
            pending.closed = true;
            mem::take(&mut pending.actions)
        };
        drop(actions);
    }

    pub fn is_closed(&self) -> bool {
        self.pending.lock().closed
    }
}

impl<C> Default for ActionQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for ActionQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionQueue")
            .field("pending", &self.len())
            .finish()
    }
}
