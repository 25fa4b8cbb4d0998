//! One launched application: process, window, frame and the bridge between.


use std::cell::RefCell;
use std::rc::Rc;

use hostframe_common::{BridgeError, FrameId, Pid};
use serde_json::json;
use tracing::{info, warn};

use crate::channel::{ChannelState, Sender};
use crate::correlator::RequestCorrelator;
use crate::dispatcher::Dispatcher;
use crate::envelope::Envelope;
use crate::frame::InboundSource;
use crate::host::{HostContext, WindowParts};
use crate::lifecycle::LifecycleProxy;
use crate::loader::FrameLoader;
use crate::process::ProcessHandle;
use crate::protocol;
use crate::window::{HostWindow, WindowOptions};

type ReadyHook = Rc<dyn Fn(&Sender)>;

/// Wires a process to its window and frame.
///
/// Dropping a session destroys its process, which closes the dispatcher,
/// discards outstanding dialog requests and unloads the frame.
pub struct Session {
    src: String,
    process: ProcessHandle,
    window: Rc<HostWindow>,
    loader: Rc<FrameLoader>,
    dispatcher: Rc<Dispatcher>,
    correlator: Rc<RequestCorrelator>,
    lifecycle: LifecycleProxy,
    ready_hooks: RefCell<Vec<ReadyHook>>,
}

impl Session {
    /// Spawn a process named `name`, open its window and start loading
    /// `resource` into a new frame.
    pub fn launch(
        ctx: &HostContext<'_>,
        name: &str,
        options: &WindowOptions,
        resource: &str,
    ) -> Result<Self, BridgeError> {
        let process = ctx.spawn(name);
        let WindowParts { window, surface } = ctx.create_window(process.pid(), options)?;

        let dispatcher = Rc::new(Dispatcher::new(window.id()));
        let correlator = Rc::new(RequestCorrelator::new(ctx.dialogs()));
        let loader = Rc::new(FrameLoader::new(surface));

        let weak_dispatcher = Rc::downgrade(&dispatcher);
        loader.set_receiver(Rc::new(move |sender: &Sender, envelope: Envelope| {
            if let Some(dispatcher) = weak_dispatcher.upgrade() {
                let (method, args) = envelope.into_parts();
                dispatcher.emit(&method, sender, &args);
            }
        }));

        {
            let dispatcher = Rc::downgrade(&dispatcher);
            let correlator = Rc::downgrade(&correlator);
            let loader = Rc::downgrade(&loader);
            process.on_destroy(move || {
                if let Some(dispatcher) = dispatcher.upgrade() {
                    dispatcher.close();
                }
                if let Some(correlator) = correlator.upgrade() {
                    correlator.discard_all();
                }
                if let Some(loader) = loader.upgrade() {
                    loader.unload();
                }
            });
        }

        let src = ctx.resource(name, resource);
        if let Err(e) = loader.load(&src, &process) {
            process.destroy();
            return Err(e);
        }
        let lifecycle = LifecycleProxy::attach(&window, Rc::downgrade(&loader), process.clone());

        info!(pid = %process.pid(), app = name, window = window.id(), "session launched");
        Ok(Self {
            src,
            process,
            window,
            loader,
            dispatcher,
            correlator,
            lifecycle,
            ready_hooks: RefCell::new(Vec::new()),
        })
    }

    /// Run `hook` each time a frame of this session becomes ready, before
    /// `init` is sent.
    pub fn on_ready(&self, hook: impl Fn(&Sender) + 'static) {
        let hook: ReadyHook = Rc::new(hook);
        self.ready_hooks.borrow_mut().push(hook);
    }

    /// The frame `frame` reports its content has initialised.
    ///
    /// Opens the channel, runs ready hooks and sends `init [pid]`. Returns
    /// `false` when the signal is stale or repeated.
    pub fn frame_ready(&self, frame: FrameId) -> bool {
        let Some(sender) = self.loader.signal_ready(frame) else {
            return false;
        };

        let hooks: Vec<ReadyHook> = self.ready_hooks.borrow().iter().cloned().collect();
        for hook in &hooks {
            hook(&sender);
        }

        let init = Envelope::new(protocol::INIT, vec![json!(self.process.pid().0)]);
        if let Err(e) = sender.send(init) {
            warn!(pid = %self.process.pid(), frame_id = %frame, error = %e, "init not delivered");
        }
        true
    }

    /// Route a raw message posted by a frame.
    pub fn deliver(&self, source: &InboundSource, raw: &str) -> Result<(), BridgeError> {
        self.loader.deliver(source, raw)
    }

    /// Replace the frame with a fresh load of the same resource.
    ///
    /// The previous channel is invalidated; the new one waits for its own
    /// ready signal.
    pub fn reload(&self) -> Result<Sender, BridgeError> {
        self.loader.load(&self.src, &self.process)
    }

    /// Destroy the process. Returns `false` if it was already destroyed.
    pub fn destroy(&self) -> bool {
        self.process.destroy()
    }

    pub fn pid(&self) -> Pid {
        self.process.pid()
    }

    pub fn name(&self) -> &str {
        self.process.name()
    }

    /// URL the frame content is loaded from.
    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn process(&self) -> &ProcessHandle {
        &self.process
    }

    pub fn window(&self) -> &Rc<HostWindow> {
        &self.window
    }

    pub fn dispatcher(&self) -> &Rc<Dispatcher> {
        &self.dispatcher
    }

    pub fn correlator(&self) -> &Rc<RequestCorrelator> {
        &self.correlator
    }

    pub fn lifecycle(&self) -> &LifecycleProxy {
        &self.lifecycle
    }

    pub fn current_frame(&self) -> Option<FrameId> {
        self.loader.current_frame()
    }

    pub fn channel_state(&self) -> Option<ChannelState> {
        self.loader.channel_state()
    }

    /// Send side of the current channel, if a frame is loaded.
    pub fn sender(&self) -> Option<Sender> {
        self.loader.sender()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.process.destroy();
    }
}
