//! Host window event source.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle transitions emitted by a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEvent {
    Focus,
    Blur,
    Destroy,
}

/// Handle returned by [`HostWindow::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

/// The on-screen container that owns one embedded frame.
///
/// The host backend calls [`HostWindow::fire`] when its native window gains
/// or loses focus or closes; the bridge subscribes with [`HostWindow::on`].
pub struct HostWindow {
    id: String,
    listeners: RefCell<Vec<(ListenerId, WindowEvent, Listener)>>,
    next_listener: Cell<u64>,
    destroyed: Cell<bool>,
}

impl HostWindow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            destroyed: Cell::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    pub fn on(&self, event: WindowEvent, listener: impl Fn() + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .push((id, event, Rc::new(listener)));
        id
    }

    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _, _)| *lid != id);
        listeners.len() != before
    }

    /// Notify listeners of `event`. Returns the number of listeners called.
    ///
    /// `Destroy` fires at most once; after it, every event is ignored and all
    /// listeners are dropped.
    pub fn fire(&self, event: WindowEvent) -> usize {
        if self.destroyed.get() {
            debug!(window = %self.id, ?event, "event ignored: window destroyed");
            return 0;
        }
        if event == WindowEvent::Destroy {
            self.destroyed.set(true);
        }

        let targets: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, e, _)| *e == event)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();

        for listener in &targets {
            listener();
        }

        if event == WindowEvent::Destroy {
            self.listeners.borrow_mut().clear();
        }
        targets.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Placement and title of a window requested by an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowOptions {
    pub id: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            id: "HostframeWindow".to_string(),
            title: "Hostframe".to_string(),
            width: 400,
            height: 400,
            x: 700,
            y: 200,
        }
    }
}

impl WindowOptions {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }
}
