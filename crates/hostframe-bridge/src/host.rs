//! Services the host provides to launched applications.

use std::cell::Cell;
use std::rc::Rc;

use hostframe_common::{BridgeError, Pid};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::correlator::DialogService;
use crate::frame::FrameSurface;
use crate::process::ProcessHandle;
use crate::window::{HostWindow, WindowOptions};

/// A freshly created window and the content area frames are inserted into.
pub struct WindowParts {
    pub window: Rc<HostWindow>,
    pub surface: Box<dyn FrameSurface>,
}

/// Host-side collaborators, opaque to the bridge.
pub trait Host {
    /// Resolve an application resource path to a URL the frame can load.
    fn resource(&self, app: &str, path: &str) -> String;

    /// Create the window owned by process `pid`.
    fn create_window(&self, pid: Pid, options: &WindowOptions) -> Result<WindowParts, BridgeError>;

    /// Dialog presenter used by the request correlator.
    fn dialogs(&self) -> Rc<dyn DialogService>;
}

/// Arguments the host passes to an application factory at launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchArgs {
    pub args: Value,
    pub options: Value,
}

/// Explicitly constructed host context handed to application factories.
///
/// Borrows the host for the duration of a launch; hosts whose windows can
/// only be created inside an event loop callback build one per callback
/// and carry [`next_pid`](HostContext::next_pid) over.
pub struct HostContext<'h> {
    host: &'h dyn Host,
    next_pid: Cell<u32>,
}

impl<'h> HostContext<'h> {
    pub fn new(host: &'h dyn Host) -> Self {
        Self::with_first_pid(host, Pid(1))
    }

    /// A context whose first spawned process gets `first`.
    pub fn with_first_pid(host: &'h dyn Host, first: Pid) -> Self {
        Self {
            host,
            next_pid: Cell::new(first.0),
        }
    }

    /// Pid the next spawned process will get.
    pub fn next_pid(&self) -> Pid {
        Pid(self.next_pid.get())
    }

    /// Create a running process with the next pid.
    pub fn spawn(&self, name: &str) -> ProcessHandle {
        let pid = Pid(self.next_pid.get());
        self.next_pid.set(pid.0 + 1);
        ProcessHandle::new(pid, name)
    }

    pub fn resource(&self, app: &str, path: &str) -> String {
        self.host.resource(app, path)
    }

    pub fn create_window(&self, pid: Pid, options: &WindowOptions) -> Result<WindowParts, BridgeError> {
        self.host.create_window(pid, options)
    }

    pub fn dialogs(&self) -> Rc<dyn DialogService> {
        self.host.dialogs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHost;

    #[test]
    fn pids_are_sequential_from_one() {
        let host = TestHost::new();
        let ctx = HostContext::new(&*host);
        assert_eq!(ctx.spawn("a").pid(), Pid(1));
        assert_eq!(ctx.spawn("b").pid(), Pid(2));
        assert_eq!(ctx.spawn("a").pid(), Pid(3));
    }

    #[test]
    fn first_pid_is_configurable() {
        let host = TestHost::new();
        let ctx = HostContext::with_first_pid(&*host, Pid(42));
        assert_eq!(ctx.spawn("a").pid(), Pid(42));
        assert_eq!(ctx.spawn("a").pid(), Pid(43));
        assert_eq!(ctx.next_pid(), Pid(44));
    }

    #[test]
    fn resource_is_resolved_by_host() {
        let host = TestHost::new();
        let ctx = HostContext::new(&*host);
        assert_eq!(
            ctx.resource("IframeDemo", "/data/index.html"),
            "hostframe://localhost/IframeDemo/data/index.html"
        );
    }

    #[test]
    fn launch_args_default_to_null() {
        let args = LaunchArgs::default();
        assert!(args.args.is_null());
        let parsed: LaunchArgs = serde_json::from_str(r#"{"args":{"file":"a.txt"}}"#).unwrap();
        assert_eq!(parsed.args["file"], "a.txt");
        assert!(parsed.options.is_null());
    }
}
