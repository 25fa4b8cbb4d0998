//! Transport endpoint bound to one loaded frame instance.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use hostframe_common::{BridgeError, FrameId};
use tracing::{debug, trace, warn};

use crate::envelope::Envelope;
use crate::frame::{FrameContent, InboundSource};
use crate::process::ProcessHandle;

/// Lifecycle of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Frame created, ready signal not yet seen.
    Pending,
    /// Frame signalled ready; sends are delivered.
    Ready,
    /// Frame unloaded or replaced. Permanent.
    Invalidated,
}

/// Receive hook: called with the channel's own sender and the parsed envelope.
pub type ReceiveHook = Rc<dyn Fn(&Sender, Envelope)>;

struct ChannelInner {
    content: Rc<dyn FrameContent>,
    frame_id: FrameId,
    origin: String,
    process: ProcessHandle,
    state: Cell<ChannelState>,
    receiver: RefCell<Option<ReceiveHook>>,
}

impl ChannelInner {
    fn send(&self, envelope: &Envelope) -> Result<(), BridgeError> {
        if self.process.is_destroyed() {
            return Err(BridgeError::ProcessDestroyed);
        }
        match self.state.get() {
            ChannelState::Invalidated => return Err(BridgeError::ChannelClosed),
            ChannelState::Pending => return Err(BridgeError::NotReady),
            ChannelState::Ready => {}
        }

        trace!(frame_id = %self.frame_id, method = envelope.method(), "posting to frame");
        self.content.post_message(envelope, &self.origin)
    }
}

/// The communication endpoint for one frame instance.
///
/// Owned by the [`crate::FrameLoader`] that created it. Everything else
/// reaches the channel through a [`Sender`], which does not keep it alive.
pub struct Channel {
    inner: Rc<ChannelInner>,
}

impl Channel {
    pub(crate) fn new(content: Rc<dyn FrameContent>, process: ProcessHandle) -> Self {
        let frame_id = content.id();
        let origin = content.origin().to_string();
        Self {
            inner: Rc::new(ChannelInner {
                content,
                frame_id,
                origin,
                process,
                state: Cell::new(ChannelState::Pending),
                receiver: RefCell::new(None),
            }),
        }
    }

    /// A second owner of the same channel, for the loader's internal use
    /// while no borrow of its slot may be held.
    pub(crate) fn share(&self) -> Channel {
        Channel {
            inner: Rc::clone(&self.inner),
        }
    }

    pub fn frame_id(&self) -> FrameId {
        self.inner.frame_id
    }

    /// Origin captured when the frame was created.
    pub fn origin(&self) -> &str {
        &self.inner.origin
    }

    pub fn state(&self) -> ChannelState {
        self.inner.state.get()
    }

    pub(crate) fn content(&self) -> Rc<dyn FrameContent> {
        Rc::clone(&self.inner.content)
    }

    /// Pending -> Ready. Returns `false` if the channel was not pending.
    pub(crate) fn mark_ready(&self) -> bool {
        if self.inner.state.get() != ChannelState::Pending {
            return false;
        }
        self.inner.state.set(ChannelState::Ready);
        true
    }

    pub(crate) fn invalidate(&self) {
        self.inner.state.set(ChannelState::Invalidated);
        self.inner.receiver.borrow_mut().take();
    }

    /// Deliver an envelope to the frame.
    pub fn send(&self, envelope: Envelope) -> Result<(), BridgeError> {
        self.inner.send(&envelope)
    }

    /// A non-owning send function for this channel.
    pub fn sender(&self) -> Sender {
        Sender {
            channel: Rc::downgrade(&self.inner),
            process: self.inner.process.clone(),
            frame_id: self.inner.frame_id,
        }
    }

    /// Install the single receive hook, replacing any previous one.
    pub fn set_receiver(&self, hook: ReceiveHook) {
        *self.inner.receiver.borrow_mut() = Some(hook);
    }

    /// Accept a raw inbound message from the frame.
    ///
    /// The source must match the frame identity captured at load time.
    /// Rejected and malformed messages are logged and reported in the
    /// returned error; they never reach the receive hook.
    pub fn receive(&self, source: &InboundSource, raw: &str) -> Result<(), BridgeError> {
        let inner = &self.inner;

        if source.frame != inner.frame_id || source.origin != inner.origin {
            warn!(
                frame_id = %inner.frame_id,
                expected = %inner.origin,
                actual = %source.origin,
                source_frame = %source.frame,
                "inbound message rejected: origin mismatch"
            );
            return Err(BridgeError::OriginMismatch {
                expected: inner.origin.clone(),
                actual: source.origin.clone(),
            });
        }

        if inner.process.is_destroyed() {
            debug!(frame_id = %inner.frame_id, "inbound message dropped: process destroyed");
            return Err(BridgeError::ProcessDestroyed);
        }

        match inner.state.get() {
            ChannelState::Ready => {}
            ChannelState::Pending => {
                debug!(frame_id = %inner.frame_id, "inbound message dropped: frame not ready");
                return Err(BridgeError::NotReady);
            }
            ChannelState::Invalidated => {
                debug!(frame_id = %inner.frame_id, "inbound message dropped: channel closed");
                return Err(BridgeError::ChannelClosed);
            }
        }

        let envelope = match Envelope::from_json(raw) {
            Ok(env) => env,
            Err(e) => {
                warn!(
                    frame_id = %inner.frame_id,
                    body_len = raw.len(),
                    error = %e,
                    "inbound message dropped"
                );
                return Err(e);
            }
        };

        // Clone the hook out so it may replace itself while running.
        let hook = inner.receiver.borrow().clone();
        match hook {
            Some(hook) => {
                debug!(frame_id = %inner.frame_id, method = envelope.method(), "message from frame");
                hook(&self.sender(), envelope);
            }
            None => {
                debug!(frame_id = %inner.frame_id, method = envelope.method(), "no receiver bound");
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("frame_id", &self.inner.frame_id)
            .field("origin", &self.inner.origin)
            .field("state", &self.inner.state.get())
            .finish()
    }
}

/// Send function handed to handlers so they can reply without resolving
/// the channel again. Holds only a weak reference to the channel.
#[derive(Clone)]
pub struct Sender {
    channel: Weak<ChannelInner>,
    process: ProcessHandle,
    frame_id: FrameId,
}

impl Sender {
    pub fn send(&self, envelope: Envelope) -> Result<(), BridgeError> {
        if self.process.is_destroyed() {
            return Err(BridgeError::ProcessDestroyed);
        }
        match self.channel.upgrade() {
            Some(inner) => inner.send(&envelope),
            None => Err(BridgeError::ChannelClosed),
        }
    }

    /// Frame this sender was created for.
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    /// Whether a send would currently be attempted.
    pub fn is_open(&self) -> bool {
        !self.process.is_destroyed()
            && self
                .channel
                .upgrade()
                .is_some_and(|inner| inner.state.get() == ChannelState::Ready)
    }
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("frame_id", &self.frame_id)
            .field("open", &self.is_open())
            .finish()
    }
}
