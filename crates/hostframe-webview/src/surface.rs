//! `FrameSurface` and `FrameContent` on top of child `wry` WebViews.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use hostframe_bridge::{Envelope, FrameContent, FrameSurface};
use hostframe_common::{BridgeError, FrameId};
use tracing::{debug, info, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::content::{ContentProvider, SCHEME};
use crate::events::{FrameEvent, FrameEvents, LoadTracker, PageLoadState};
use crate::ipc::{deliver_script, FRAME_INIT_SCRIPT};
use crate::navigation::{frame_origin, is_navigation_allowed};

/// Per-frame WebView settings.
#[derive(Debug, Clone, Default)]
pub struct FrameOptions {
    pub devtools: bool,
    pub user_agent: Option<String>,
    /// Navigation allowlist additions.
    pub extra_origins: Vec<String>,
}

/// Bounds covering a whole window content area.
pub fn fill_bounds(width: f64, height: f64) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(width, height)),
    }
}

fn frame_error(e: wry::Error) -> BridgeError {
    BridgeError::Frame(e.to_string())
}

/// One frame: a child WebView and the origin it was loaded from.
pub struct WryFrame {
    id: FrameId,
    origin: String,
    webview: WebView,
}

impl WryFrame {
    pub fn webview(&self) -> &WebView {
        &self.webview
    }
}

impl FrameContent for WryFrame {
    fn id(&self) -> FrameId {
        self.id
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn post_message(&self, envelope: &Envelope, target_origin: &str) -> Result<(), BridgeError> {
        // The document may have navigated since load.
        let current = self.webview.url().map_err(frame_error)?;
        let actual = frame_origin(&current);
        if actual != target_origin {
            return Err(BridgeError::OriginMismatch {
                expected: target_origin.to_string(),
                actual,
            });
        }
        self.webview
            .evaluate_script(&deliver_script(envelope))
            .map_err(frame_error)
    }

    fn focus(&self) -> Result<(), BridgeError> {
        self.webview.focus().map_err(frame_error)
    }

    fn blur(&self) -> Result<(), BridgeError> {
        self.webview.focus_parent().map_err(frame_error)
    }
}

/// Live frames of one surface, shared with the host for resizing.
#[derive(Clone)]
pub struct FrameSet {
    frames: Rc<RefCell<HashMap<FrameId, Rc<WryFrame>>>>,
    bounds: Rc<RefCell<wry::Rect>>,
}

impl FrameSet {
    fn new(bounds: wry::Rect) -> Self {
        Self {
            frames: Rc::new(RefCell::new(HashMap::new())),
            bounds: Rc::new(RefCell::new(bounds)),
        }
    }

    /// Move every frame to `bounds`; frames created later use them too.
    pub fn set_bounds(&self, bounds: wry::Rect) {
        for (id, frame) in self.frames.borrow().iter() {
            if let Err(e) = frame.webview.set_bounds(bounds.clone()) {
                warn!(frame_id = %id, error = %e, "failed to resize frame");
            }
        }
        *self.bounds.borrow_mut() = bounds;
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }
}

/// Content area of one host window.
///
/// Every frame is a child WebView of `window` that loads through the
/// `hostframe://` protocol and reports into `events`.
pub struct WryFrameSurface<W> {
    window: Rc<W>,
    options: FrameOptions,
    content: Arc<ContentProvider>,
    events: FrameEvents,
    frames: FrameSet,
    next_id: u64,
}

impl<W: HasWindowHandle> WryFrameSurface<W> {
    pub fn new(
        window: Rc<W>,
        bounds: wry::Rect,
        options: FrameOptions,
        content: Arc<ContentProvider>,
        events: FrameEvents,
    ) -> Self {
        Self {
            window,
            options,
            content,
            events,
            frames: FrameSet::new(bounds),
            next_id: 1,
        }
    }

    pub fn frames(&self) -> FrameSet {
        self.frames.clone()
    }

    fn build(&self, id: FrameId, src: &str) -> Result<WebView, wry::Error> {
        let bounds = self.frames.bounds.borrow().clone();
        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_devtools(self.options.devtools)
            .with_focused(false)
            .with_initialization_script(FRAME_INIT_SCRIPT)
            .with_url(src);

        if let Some(ua) = &self.options.user_agent {
            builder = builder.with_user_agent(ua);
        }

        let events = self.events.clone();
        builder = builder.with_ipc_handler(move |request| {
            let origin = frame_origin(&request.uri().to_string());
            let body = request.body().to_string();
            debug!(frame_id = %id, origin = %origin, body_len = body.len(), "message from frame script");
            events.push(FrameEvent::Message {
                frame: id,
                origin,
                body,
            });
        });

        let events = self.events.clone();
        let tracker = LoadTracker::new(id);
        builder = builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(frame_id = %id, ?state, url = %url, "page load");
            if let Some(event) = tracker.on_page_load(state, url) {
                events.push(event);
            }
        });

        let events = self.events.clone();
        let extra = self.options.extra_origins.clone();
        builder = builder.with_navigation_handler(move |url| {
            if is_navigation_allowed(&url, &extra) {
                return true;
            }
            warn!(frame_id = %id, url = %url, "navigation blocked: URL not in allowlist");
            events.push(FrameEvent::NavigationBlocked { frame: id, url });
            false
        });

        let content = Arc::clone(&self.content);
        builder = builder.with_custom_protocol(SCHEME.to_string(), move |_webview_id, request| {
            content.respond(&request.uri().to_string())
        });

        builder.build_as_child(self.window.as_ref())
    }
}

impl<W: HasWindowHandle> FrameSurface for WryFrameSurface<W> {
    fn create_frame(&mut self, src: &str) -> Result<Rc<dyn FrameContent>, BridgeError> {
        let id = FrameId(self.next_id);
        self.next_id += 1;

        let webview = self.build(id, src).map_err(frame_error)?;
        let frame = Rc::new(WryFrame {
            id,
            origin: frame_origin(src),
            webview,
        });
        self.frames
            .frames
            .borrow_mut()
            .insert(id, Rc::clone(&frame));
        info!(frame_id = %id, src, "webview created");
        Ok(frame)
    }

    fn remove_frame(&mut self, id: FrameId) {
        let Some(frame) = self.frames.frames.borrow_mut().remove(&id) else {
            return;
        };
        // The channel may still hold the frame briefly; hide it now.
        if let Err(e) = frame.webview.set_visible(false) {
            debug!(frame_id = %id, error = %e, "failed to hide removed frame");
        }
        debug!(frame_id = %id, "webview removed");
    }
}
