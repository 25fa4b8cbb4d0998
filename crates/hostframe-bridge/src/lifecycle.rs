//! Forwards host window lifecycle into the frame and the process.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::loader::FrameLoader;
use crate::process::ProcessHandle;
use crate::window::{HostWindow, ListenerId, WindowEvent};

#[derive(Default)]
struct Counters {
    focus: Cell<usize>,
    blur: Cell<usize>,
}

/// Window subscriptions for one process/window pair.
///
/// Focus and blur are forwarded to whichever frame is current and ready,
/// best effort. Destroy destroys the process.
pub struct LifecycleProxy {
    window: Weak<HostWindow>,
    listeners: Vec<ListenerId>,
    counters: Rc<Counters>,
}

impl LifecycleProxy {
    pub fn attach(window: &Rc<HostWindow>, loader: Weak<FrameLoader>, process: ProcessHandle) -> Self {
        let counters = Rc::new(Counters::default());

        let focus = {
            let loader = loader.clone();
            let process = process.clone();
            let counters = Rc::clone(&counters);
            window.on(WindowEvent::Focus, move || {
                if forward(&loader, &process, WindowEvent::Focus) {
                    counters.focus.set(counters.focus.get() + 1);
                }
            })
        };

        let blur = {
            let process = process.clone();
            let counters = Rc::clone(&counters);
            window.on(WindowEvent::Blur, move || {
                if forward(&loader, &process, WindowEvent::Blur) {
                    counters.blur.set(counters.blur.get() + 1);
                }
            })
        };

        let destroy = window.on(WindowEvent::Destroy, move || {
            debug!(pid = %process.pid(), "window destroyed");
            process.destroy();
        });

        Self {
            window: Rc::downgrade(window),
            listeners: vec![focus, blur, destroy],
            counters,
        }
    }

    /// Number of focus and blur events actually delivered to the frame.
    pub fn forwarded(&self) -> (usize, usize) {
        (self.counters.focus.get(), self.counters.blur.get())
    }

    /// Remove this proxy's window subscriptions.
    pub fn detach(&mut self) {
        if let Some(window) = self.window.upgrade() {
            for id in self.listeners.drain(..) {
                window.off(id);
            }
        }
        self.listeners.clear();
    }
}

impl Drop for LifecycleProxy {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Forward focus or blur. Failures stop here.
fn forward(loader: &Weak<FrameLoader>, process: &ProcessHandle, event: WindowEvent) -> bool {
    if process.is_destroyed() {
        debug!(pid = %process.pid(), ?event, "not forwarded: process destroyed");
        return false;
    }
    let Some(content) = loader.upgrade().and_then(|l| l.ready_content()) else {
        debug!(pid = %process.pid(), ?event, "not forwarded: no ready frame");
        return false;
    };

    let result = match event {
        WindowEvent::Focus => content.focus(),
        WindowEvent::Blur => content.blur(),
        WindowEvent::Destroy => return false,
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(pid = %process.pid(), frame_id = %content.id(), ?event, error = %e, "forward failed");
            false
        }
    }
}
