//! Frame creation and the one-time ready transition.

use std::cell::RefCell;
use std::rc::Rc;

use hostframe_common::{BridgeError, FrameId};
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelState, ReceiveHook, Sender};
use crate::frame::{FrameContent, FrameSurface, InboundSource};
use crate::process::ProcessHandle;

/// Creates frames in a window's content area and owns their channels.
///
/// At most one frame is current. Loading again replaces it and invalidates
/// the previous channel. No borrow of internal state is held while frame
/// callbacks run, so handlers may call back into the loader.
pub struct FrameLoader {
    surface: RefCell<Box<dyn FrameSurface>>,
    current: RefCell<Option<Channel>>,
    receiver: RefCell<Option<ReceiveHook>>,
}

impl FrameLoader {
    pub fn new(surface: Box<dyn FrameSurface>) -> Self {
        Self {
            surface: RefCell::new(surface),
            current: RefCell::new(None),
            receiver: RefCell::new(None),
        }
    }

    /// Receive hook installed into every channel this loader creates.
    pub fn set_receiver(&self, hook: ReceiveHook) {
        if let Some(channel) = self.current.borrow().as_ref() {
            channel.set_receiver(Rc::clone(&hook));
        }
        *self.receiver.borrow_mut() = Some(hook);
    }

    /// Create a frame for `src` and return the send side of its channel.
    ///
    /// The channel stays pending until [`signal_ready`] is called for the new
    /// frame; sending before that fails with `NotReady`.
    ///
    /// [`signal_ready`]: FrameLoader::signal_ready
    pub fn load(&self, src: &str, process: &ProcessHandle) -> Result<Sender, BridgeError> {
        if process.is_destroyed() {
            return Err(BridgeError::ProcessDestroyed);
        }
        self.unload();

        let content = self.surface.borrow_mut().create_frame(src)?;
        let channel = Channel::new(content, process.clone());
        if let Some(hook) = self.receiver.borrow().as_ref() {
            channel.set_receiver(Rc::clone(hook));
        }

        info!(pid = %process.pid(), frame_id = %channel.frame_id(), src, "frame created");
        let sender = channel.sender();
        *self.current.borrow_mut() = Some(channel);
        Ok(sender)
    }

    /// The frame reports its content has initialised.
    ///
    /// Returns the channel's sender the first time this fires for the current
    /// frame and `None` for repeats, stale frames, or when nothing is loaded.
    pub fn signal_ready(&self, frame: FrameId) -> Option<Sender> {
        let current = self.current.borrow();
        let Some(channel) = current.as_ref() else {
            debug!(frame_id = %frame, "ready signal ignored: no frame loaded");
            return None;
        };
        if channel.frame_id() != frame {
            debug!(frame_id = %frame, current = %channel.frame_id(), "ready signal ignored: stale frame");
            return None;
        }
        if !channel.mark_ready() {
            debug!(frame_id = %frame, state = ?channel.state(), "ready signal ignored");
            return None;
        }
        info!(frame_id = %frame, origin = channel.origin(), "frame ready");
        Some(channel.sender())
    }

    /// Invalidate the current channel and remove its frame.
    pub fn unload(&self) {
        let Some(channel) = self.current.borrow_mut().take() else {
            return;
        };
        channel.invalidate();
        self.surface.borrow_mut().remove_frame(channel.frame_id());
        debug!(frame_id = %channel.frame_id(), "frame unloaded");
    }

    /// Route a raw inbound message to the current channel.
    pub fn deliver(&self, source: &InboundSource, raw: &str) -> Result<(), BridgeError> {
        let channel = self.current.borrow().as_ref().map(Channel::share);
        match channel {
            Some(channel) => channel.receive(source, raw),
            None => {
                warn!(frame_id = %source.frame, origin = %source.origin, "inbound message dropped: no frame loaded");
                Err(BridgeError::ChannelClosed)
            }
        }
    }

    pub fn current_frame(&self) -> Option<FrameId> {
        self.current.borrow().as_ref().map(Channel::frame_id)
    }

    pub fn channel_state(&self) -> Option<ChannelState> {
        self.current.borrow().as_ref().map(Channel::state)
    }

    /// Send side of the current channel, ready or not.
    pub fn sender(&self) -> Option<Sender> {
        self.current.borrow().as_ref().map(Channel::sender)
    }

    /// Content handle of the current frame, only once it is ready.
    pub fn ready_content(&self) -> Option<Rc<dyn FrameContent>> {
        self.current
            .borrow()
            .as_ref()
            .filter(|c| c.state() == ChannelState::Ready)
            .map(Channel::content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::testing::{RecordingSurface, SurfaceLog};
    use hostframe_common::Pid;
    use serde_json::json;

    const SRC: &str = "hostframe://localhost/IframeDemo/data/index.html";

    fn loader() -> (FrameLoader, SurfaceLog, ProcessHandle) {
        let (surface, log) = RecordingSurface::new();
        (
            FrameLoader::new(Box::new(surface)),
            log,
            ProcessHandle::new(Pid(42), "IframeDemo"),
        )
    }

    #[test]
    fn load_creates_pending_frame() {
        let (loader, log, process) = loader();
        let sender = loader.load(SRC, &process).unwrap();

        assert_eq!(log.count(), 1);
        assert_eq!(log.sources(), vec![SRC.to_string()]);
        assert_eq!(loader.current_frame(), Some(FrameId(1)));
        assert_eq!(loader.channel_state(), Some(ChannelState::Pending));
        assert_eq!(
            sender.send(Envelope::bare("init")),
            Err(BridgeError::NotReady)
        );
        assert!(loader.ready_content().is_none());
    }

    #[test]
    fn ready_signal_opens_channel_once() {
        let (loader, log, process) = loader();
        loader.load(SRC, &process).unwrap();

        let sender = loader.signal_ready(FrameId(1)).unwrap();
        assert!(loader.signal_ready(FrameId(1)).is_none());

        sender
            .send(Envelope::new("init", vec![json!(42)]))
            .unwrap();
        assert_eq!(log.last().posted(), vec![Envelope::new("init", vec![json!(42)])]);
        assert!(loader.ready_content().is_some());
    }

    #[test]
    fn ready_for_other_frame_is_ignored() {
        let (loader, _, process) = loader();
        loader.load(SRC, &process).unwrap();
        assert!(loader.signal_ready(FrameId(9)).is_none());
        assert_eq!(loader.channel_state(), Some(ChannelState::Pending));
    }

    #[test]
    fn ready_with_nothing_loaded_is_ignored() {
        let (loader, _, _) = loader();
        assert!(loader.signal_ready(FrameId(1)).is_none());
    }

    #[test]
    fn reload_invalidates_previous_channel() {
        let (loader, log, process) = loader();
        let old = loader.load(SRC, &process).unwrap();
        loader.signal_ready(FrameId(1)).unwrap();

        let new = loader.load(SRC, &process).unwrap();
        assert_eq!(log.removed(), vec![FrameId(1)]);
        assert_eq!(loader.current_frame(), Some(FrameId(2)));
        assert_eq!(old.send(Envelope::bare("yo")), Err(BridgeError::ChannelClosed));
        assert_eq!(new.send(Envelope::bare("yo")), Err(BridgeError::NotReady));

        // The old frame's ready signal can no longer open anything.
        assert!(loader.signal_ready(FrameId(1)).is_none());
        loader.signal_ready(FrameId(2)).unwrap();
        new.send(Envelope::bare("yo")).unwrap();
        assert!(log.frame(0).posted().is_empty());
        assert_eq!(log.frame(1).posted().len(), 1);
    }

    #[test]
    fn load_after_destroy_is_refused() {
        let (loader, log, process) = loader();
        process.destroy();
        assert_eq!(
            loader.load(SRC, &process).unwrap_err(),
            BridgeError::ProcessDestroyed
        );
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn surface_failure_propagates() {
        let loader = FrameLoader::new(Box::new(RecordingSurface::failing()));
        let process = ProcessHandle::new(Pid(1), "app");
        assert!(matches!(
            loader.load(SRC, &process),
            Err(BridgeError::Frame(_))
        ));
        assert_eq!(loader.current_frame(), None);
    }

    #[test]
    fn deliver_routes_to_receiver() {
        let (loader, _, process) = loader();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        loader.set_receiver(Rc::new(move |_: &Sender, env: Envelope| {
            sink.borrow_mut().push(env.method().to_string());
        }));
        loader.load(SRC, &process).unwrap();
        loader.signal_ready(FrameId(1));

        let source = InboundSource::new(FrameId(1), "hostframe://localhost");
        loader.deliver(&source, r#"{"method":"yo","args":[]}"#).unwrap();
        assert_eq!(*seen.borrow(), vec!["yo".to_string()]);
    }

    #[test]
    fn receiver_may_unload_while_delivering() {
        let (surface, log) = RecordingSurface::new();
        let loader = Rc::new(FrameLoader::new(Box::new(surface)));
        let process = ProcessHandle::new(Pid(1), "app");
        let weak = Rc::downgrade(&loader);
        loader.set_receiver(Rc::new(move |_: &Sender, _: Envelope| {
            if let Some(loader) = weak.upgrade() {
                loader.unload();
            }
        }));
        loader.load(SRC, &process).unwrap();
        loader.signal_ready(FrameId(1));

        let source = InboundSource::new(FrameId(1), "hostframe://localhost");
        loader.deliver(&source, r#"{"method":"close","args":[]}"#).unwrap();
        assert_eq!(loader.current_frame(), None);
        assert_eq!(log.removed(), vec![FrameId(1)]);
    }

    #[test]
    fn deliver_with_nothing_loaded_is_closed() {
        let (loader, _, _) = loader();
        let source = InboundSource::new(FrameId(1), "hostframe://localhost");
        assert_eq!(
            loader.deliver(&source, r#"{"method":"yo","args":[]}"#),
            Err(BridgeError::ChannelClosed)
        );
    }
}
