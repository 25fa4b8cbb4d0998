//! Host-side application process handle.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use hostframe_common::Pid;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Running,
    Destroyed,
}

type DestroyHook = Box<dyn FnOnce()>;

struct ProcessInner {
    pid: Pid,
    name: String,
    state: Cell<ProcessState>,
    hooks: RefCell<Vec<DestroyHook>>,
}

/// Shared handle to one running application instance.
///
/// Cloning the handle does not clone the process; every clone observes the
/// same state. A process is destroyed at most once.
#[derive(Clone)]
pub struct ProcessHandle {
    inner: Rc<ProcessInner>,
}

impl ProcessHandle {
    pub fn new(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ProcessInner {
                pid,
                name: name.into(),
                state: Cell::new(ProcessState::Running),
                hooks: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn pid(&self) -> Pid {
        self.inner.pid
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> ProcessState {
        self.inner.state.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state() == ProcessState::Destroyed
    }

    /// Register a hook to run when the process is destroyed.
    ///
    /// Hooks run once, in registration order. A hook registered after the
    /// process is already destroyed runs immediately.
    pub fn on_destroy(&self, hook: impl FnOnce() + 'static) {
        if self.is_destroyed() {
            hook();
            return;
        }
        self.inner.hooks.borrow_mut().push(Box::new(hook));
    }

    /// Destroy the process. Returns `false` if it was already destroyed.
    pub fn destroy(&self) -> bool {
        if self.is_destroyed() {
            debug!(pid = %self.pid(), "process already destroyed");
            return false;
        }
        self.inner.state.set(ProcessState::Destroyed);

        // Take the hooks out before running them so a hook may touch the
        // process again without a re-entrant borrow.
        let hooks = std::mem::take(&mut *self.inner.hooks.borrow_mut());
        let count = hooks.len();
        for hook in hooks {
            hook();
        }

        info!(pid = %self.pid(), name = %self.name(), hooks = count, "process destroyed");
        true
    }

    /// Whether two handles refer to the same process.
    pub fn same_process(&self, other: &ProcessHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.inner.pid)
            .field("name", &self.inner.name)
            .field("state", &self.inner.state.get())
            .finish()
    }
}
