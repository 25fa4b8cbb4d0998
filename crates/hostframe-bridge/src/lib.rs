//! Message bridge between a host process and the sandboxed frame it embeds.
//!
//! The bridge is single-threaded and event driven: every type here lives on
//! the host's UI thread and uses `Rc`/`RefCell` rather than locks.
//!
//! - [`FrameLoader`] creates the frame and gates its [`Channel`] on a one-time
//!   ready signal
//! - [`Channel`] carries [`Envelope`]s to and from exactly one frame instance
//! - [`Dispatcher`] fans inbound envelopes out to handlers by method name
//! - [`LifecycleProxy`] forwards window focus/blur into the frame and turns
//!   window destroy into process destroy
//! - [`RequestCorrelator`] pairs dialog requests with exactly one response
//! - [`Session`] assembles all of the above for one process/window pair

pub mod apps;
pub mod channel;
pub mod correlator;
pub mod dispatcher;
pub mod envelope;
pub mod frame;
pub mod host;
pub mod lifecycle;
pub mod loader;
pub mod process;
pub mod protocol;
pub mod registry;
pub mod session;
pub mod window;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{Channel, ChannelState, Sender};
pub use correlator::{
    DialogChoice, DialogCompletion, DialogRequest, DialogService, RequestCorrelator, RequestState,
};
pub use dispatcher::{Dispatcher, SubscriptionId};
pub use envelope::Envelope;
pub use frame::{origin_of, FrameContent, FrameSurface, InboundSource};
pub use host::{Host, HostContext, LaunchArgs, WindowParts};
pub use lifecycle::LifecycleProxy;
pub use loader::FrameLoader;
pub use process::{ProcessHandle, ProcessState};
pub use registry::AppRegistry;
pub use session::Session;
pub use window::{HostWindow, ListenerId, WindowEvent, WindowOptions};
