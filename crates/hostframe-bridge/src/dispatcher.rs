//! Per-window publish/subscribe registry keyed by envelope method.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use hostframe_common::BridgeError;
use serde_json::Value;
use tracing::{debug, trace};

use crate::channel::Sender;

/// A handler receives the originating channel's sender and the envelope args.
pub type Handler = Rc<dyn Fn(&Sender, &[Value])>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Routes frame-originated messages to host-side handlers.
///
/// Scoped to one window/process pair. Closing the dispatcher (on process
/// destroy) drops every handler and refuses new subscriptions.
pub struct Dispatcher {
    scope: String,
    handlers: RefCell<HashMap<String, Vec<(SubscriptionId, Handler)>>>,
    next_id: Cell<u64>,
    closed: Cell<bool>,
}

impl Dispatcher {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            handlers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            closed: Cell::new(false),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Register a handler for `method`. Several handlers may share a method;
    /// they run in registration order.
    pub fn on(
        &self,
        method: impl Into<String>,
        handler: impl Fn(&Sender, &[Value]) + 'static,
    ) -> Result<SubscriptionId, BridgeError> {
        if self.closed.get() {
            return Err(BridgeError::ProcessDestroyed);
        }
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let method = method.into();
        trace!(scope = %self.scope, method = %method, "handler registered");
        let handler: Handler = Rc::new(handler);
        self.handlers
            .borrow_mut()
            .entry(method)
            .or_default()
            .push((id, handler));
        Ok(id)
    }

    /// Remove one handler. Returns `false` if it was not registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let mut removed = false;
        handlers.retain(|_, list| {
            let before = list.len();
            list.retain(|(sid, _)| *sid != id);
            removed |= list.len() != before;
            !list.is_empty()
        });
        removed
    }

    /// Invoke every handler registered for `method`, in registration order,
    /// before returning. Returns how many handlers ran; zero is not an error.
    ///
    /// The handler list is snapshotted first, so handlers registered while
    /// this emit runs first see the next one.
    pub fn emit(&self, method: &str, sender: &Sender, args: &[Value]) -> usize {
        let targets: Vec<Handler> = match self.handlers.borrow().get(method) {
            Some(list) => list.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => {
                trace!(scope = %self.scope, method, "no handlers");
                return 0;
            }
        };

        for handler in &targets {
            handler(sender, args);
        }
        targets.len()
    }

    pub fn handler_count(&self, method: &str) -> usize {
        self.handlers.borrow().get(method).map_or(0, Vec::len)
    }

    /// Drop every handler and refuse further subscriptions.
    pub fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        let dropped: usize = self.handlers.borrow().values().map(Vec::len).sum();
        self.handlers.borrow_mut().clear();
        debug!(scope = %self.scope, handlers = dropped, "dispatcher closed");
    }
}
