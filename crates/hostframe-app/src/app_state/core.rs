//! HostframeApp struct definition, constructor and launching.

use std::time::Instant;

use hostframe_bridge::{AppRegistry, HostContext, LaunchArgs, Session};
use hostframe_common::{BridgeError, Pid};
use hostframe_config::HostframeConfig;
use winit::event_loop::ActiveEventLoop;

use crate::host::{HostResources, WinitHost};

/// Top-level application state.
pub struct HostframeApp {
    pub(super) registry: AppRegistry,
    /// Application launched when the event loop first resumes.
    pub(super) launch: String,
    pub(super) launched: bool,
    pub(super) resources: HostResources,
    pub(super) sessions: Vec<Session>,
    pub(super) next_pid: Pid,
    pub(super) last_poll: Instant,
}

impl HostframeApp {
    pub fn new(config: &HostframeConfig, registry: AppRegistry, launch: impl Into<String>) -> Self {
        Self {
            registry,
            launch: launch.into(),
            launched: false,
            resources: HostResources::from_config(config),
            sessions: Vec::new(),
            next_pid: Pid(1),
            last_poll: Instant::now(),
        }
    }

    /// Launch `name` with a host bound to this callback's event loop.
    pub(super) fn launch_app(
        &mut self,
        event_loop: &ActiveEventLoop,
        name: &str,
        args: &LaunchArgs,
    ) -> Result<Pid, BridgeError> {
        let first = self.next_pid;
        let host = WinitHost::new(event_loop, &self.resources);
        let ctx = HostContext::with_first_pid(&host, first);
        let launched = self.registry.launch(name, &ctx, args);
        self.next_pid = ctx.next_pid();

        let session = match launched {
            Ok(session) => session,
            Err(e) => {
                // The factory may have opened windows before failing.
                for pid in first.0..self.next_pid.0 {
                    self.resources.close_windows(Pid(pid));
                }
                return Err(e);
            }
        };
        let pid = session.pid();
        self.sessions.push(session);
        Ok(pid)
    }

    pub(super) fn session(&self, pid: Pid) -> Option<&Session> {
        self.sessions.iter().find(|s| s.pid() == pid)
    }

    /// Forget sessions whose process is gone, along with their windows.
    pub(super) fn reap_sessions(&mut self) {
        let resources = &self.resources;
        self.sessions.retain(|session| {
            if !session.process().is_destroyed() {
                return true;
            }
            resources.close_windows(session.pid());
            tracing::info!(pid = %session.pid(), app = session.name(), "session ended");
            false
        });
    }
}
