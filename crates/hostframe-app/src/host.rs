//! Native windows and WebView frames behind the bridge's `Host` trait.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use hostframe_bridge::{DialogService, Host, HostWindow, WindowOptions, WindowParts};
use hostframe_common::{BridgeError, Pid};
use hostframe_config::HostframeConfig;
use hostframe_webview::{
    fill_bounds, ContentProvider, FrameEvents, FrameOptions, FrameSet, WryFrameSurface,
    CONTENT_ORIGIN,
};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId};

use crate::dialogs::NativeDialogs;

/// A top-level window opened for a process.
pub struct NativeWindow {
    pub pid: Pid,
    pub window: Rc<Window>,
    pub host_window: Rc<HostWindow>,
    pub events: FrameEvents,
    pub frames: FrameSet,
}

impl NativeWindow {
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// Resize every frame to the window's current content area.
    pub fn fit_frames(&self) {
        let size = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        self.frames.set_bounds(fill_bounds(size.width, size.height));
    }
}

/// State shared by every launch: content, dialogs and open windows.
pub struct HostResources {
    content: Arc<ContentProvider>,
    frame_options: FrameOptions,
    dialogs: Rc<NativeDialogs>,
    windows: RefCell<Vec<NativeWindow>>,
}

impl HostResources {
    pub fn from_config(config: &HostframeConfig) -> Self {
        Self {
            content: Arc::new(ContentProvider::new(config.frame.content_root.clone())),
            frame_options: FrameOptions {
                devtools: config.frame.devtools,
                user_agent: config.frame.user_agent.clone(),
                extra_origins: config.frame.extra_origins.clone(),
            },
            dialogs: Rc::new(NativeDialogs::new()),
            windows: RefCell::new(Vec::new()),
        }
    }

    pub fn dialogs(&self) -> &NativeDialogs {
        &self.dialogs
    }

    pub fn window_count(&self) -> usize {
        self.windows.borrow().len()
    }

    /// Pid owning the native window `id`.
    pub fn pid_for(&self, id: WindowId) -> Option<Pid> {
        self.windows.borrow().iter().find(|w| w.id() == id).map(|w| w.pid)
    }

    /// Run `f` on the native window `id`, if it is still open.
    pub fn with_window<R>(&self, id: WindowId, f: impl FnOnce(&NativeWindow) -> R) -> Option<R> {
        self.windows.borrow().iter().find(|w| w.id() == id).map(f)
    }

    /// Drop the records of windows owned by `pid`.
    pub fn close_windows(&self, pid: Pid) -> usize {
        let mut windows = self.windows.borrow_mut();
        let before = windows.len();
        windows.retain(|w| w.pid != pid);
        before - windows.len()
    }

    /// Drain queued frame events of every open window, tagged with the owner.
    pub fn drain_events(&self) -> Vec<(Pid, hostframe_webview::FrameEvent)> {
        self.windows
            .borrow()
            .iter()
            .flat_map(|w| w.events.drain().into_iter().map(move |e| (w.pid, e)))
            .collect()
    }
}

/// `Host` for the duration of one event loop callback.
pub struct WinitHost<'a> {
    event_loop: &'a ActiveEventLoop,
    resources: &'a HostResources,
}

impl<'a> WinitHost<'a> {
    pub fn new(event_loop: &'a ActiveEventLoop, resources: &'a HostResources) -> Self {
        Self {
            event_loop,
            resources,
        }
    }
}

/// URL of an application resource served by the content protocol.
pub fn resource_url(app: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    format!("{CONTENT_ORIGIN}/{app}/{path}")
}

impl Host for WinitHost<'_> {
    fn resource(&self, app: &str, path: &str) -> String {
        resource_url(app, path)
    }

    fn create_window(&self, pid: Pid, options: &WindowOptions) -> Result<WindowParts, BridgeError> {
        let attrs = Window::default_attributes()
            .with_title(options.title.as_str())
            .with_inner_size(LogicalSize::new(options.width, options.height))
            .with_position(LogicalPosition::new(options.x, options.y));
        let window = self
            .event_loop
            .create_window(attrs)
            .map(Rc::new)
            .map_err(|e| BridgeError::Frame(format!("window creation failed: {e}")))?;

        let events = FrameEvents::new();
        let surface = WryFrameSurface::new(
            Rc::clone(&window),
            fill_bounds(f64::from(options.width), f64::from(options.height)),
            self.resources.frame_options.clone(),
            Arc::clone(&self.resources.content),
            events.clone(),
        );
        let frames = surface.frames();
        let host_window = Rc::new(HostWindow::new(options.id.as_str()));

        let native = NativeWindow {
            pid,
            window,
            host_window: Rc::clone(&host_window),
            events,
            frames,
        };
        native.fit_frames();
        self.resources.windows.borrow_mut().push(native);

        tracing::info!(%pid, window = %options.id, title = %options.title, "window opened");
        Ok(WindowParts {
            window: host_window,
            surface: Box::new(surface),
        })
    }

    fn dialogs(&self) -> Rc<dyn DialogService> {
        self.resources.dialogs.clone()
    }
}
