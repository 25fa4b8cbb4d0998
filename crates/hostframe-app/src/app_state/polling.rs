//! Frame event polling and wake-up scheduling.

use std::time::Instant;

use hostframe_bridge::{InboundSource, Session};
use hostframe_webview::FrameEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};

use super::core::HostframeApp;
use super::types::POLL_INTERVAL;

impl HostframeApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_frame_events();
            if self.resources.dialogs().has_pending() {
                self.resources.dialogs().show_pending();
            }
            self.reap_sessions();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    /// Route queued WebView events to the sessions owning them.
    fn poll_frame_events(&mut self) {
        for (pid, event) in self.resources.drain_events() {
            match self.session(pid) {
                Some(session) => route_frame_event(session, event),
                None => tracing::debug!(%pid, frame_id = %event.frame(), "frame event without session"),
            }
        }
    }
}

/// Apply one WebView event to `session`.
pub(super) fn route_frame_event(session: &Session, event: FrameEvent) {
    match event {
        FrameEvent::Ready { frame, url } => {
            if !session.frame_ready(frame) {
                tracing::debug!(pid = %session.pid(), frame_id = %frame, url = %url, "ready ignored");
            }
        }
        FrameEvent::Unloaded { frame, url } => {
            if session.current_frame() != Some(frame) {
                return;
            }
            // The document navigated away; start over with a fresh frame.
            tracing::info!(pid = %session.pid(), frame_id = %frame, url = %url, "frame unloaded, reloading");
            if let Err(e) = session.reload() {
                tracing::warn!(pid = %session.pid(), error = %e, "reload failed");
            }
        }
        FrameEvent::Message {
            frame,
            origin,
            body,
        } => {
            let source = InboundSource::new(frame, origin);
            if let Err(e) = session.deliver(&source, &body) {
                tracing::debug!(pid = %session.pid(), frame_id = %frame, error = %e, "inbound message dropped");
            }
        }
        FrameEvent::NavigationBlocked { frame, url } => {
            tracing::debug!(pid = %session.pid(), frame_id = %frame, url = %url, "navigation blocked");
        }
    }
}
