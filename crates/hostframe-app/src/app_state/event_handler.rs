//! `ApplicationHandler` implementation for the winit event loop.

use hostframe_bridge::{LaunchArgs, WindowEvent as HostEvent};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::WindowId;

use super::core::HostframeApp;

impl ApplicationHandler for HostframeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.launched {
            return;
        }
        self.launched = true;

        let name = self.launch.clone();
        match self.launch_app(event_loop, &name, &LaunchArgs::default()) {
            Ok(pid) => tracing::info!(%pid, app = %name, "application launched"),
            Err(e) => {
                tracing::error!(app = %name, error = %e, "launch failed");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(pid) = self.resources.pid_for(window_id) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(%pid, "window close requested");
                self.resources
                    .with_window(window_id, |w| w.host_window.fire(HostEvent::Destroy));
                self.reap_sessions();
                if self.sessions.is_empty() {
                    event_loop.exit();
                }
            }

            WindowEvent::Focused(focused) => {
                let event = if focused { HostEvent::Focus } else { HostEvent::Blur };
                self.resources
                    .with_window(window_id, |w| w.host_window.fire(event));
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.resources.with_window(window_id, |w| w.fit_frames());
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_and_schedule(event_loop);
        if self.launched && self.sessions.is_empty() && self.resources.window_count() == 0 {
            tracing::info!("no sessions left");
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
