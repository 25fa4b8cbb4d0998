//! Graceful shutdown: destroy every process, then close its windows.

use super::core::HostframeApp;

impl HostframeApp {
    /// Destroy all sessions.
    ///
    /// Destroying a process closes its dispatcher, discards outstanding
    /// dialog requests and unloads its frame before the window goes away.
    pub(super) fn shutdown(&mut self) {
        tracing::info!(sessions = self.sessions.len(), "initiating shutdown");
        for session in &self.sessions {
            session.destroy();
        }
        self.reap_sessions();
        tracing::info!("shutdown complete");
    }
}
