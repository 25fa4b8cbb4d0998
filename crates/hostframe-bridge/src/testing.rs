//! In-memory collaborators for bridge tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hostframe_common::{BridgeError, FrameId, Pid};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

use crate::correlator::{DialogCompletion, DialogRequest, DialogService};
use crate::envelope::Envelope;
use crate::frame::{origin_of, FrameContent, FrameSurface};
use crate::host::{Host, WindowParts};
use crate::window::{HostWindow, WindowOptions};

// =============================================================================
// FRAME
// =============================================================================

pub(crate) struct RecordingFrame {
    id: FrameId,
    origin: String,
    posted: RefCell<Vec<Envelope>>,
    focused: Cell<usize>,
    blurred: Cell<usize>,
    torn_down: Cell<bool>,
}

impl RecordingFrame {
    pub(crate) fn new(id: u64, origin: &str) -> Rc<Self> {
        Rc::new(Self {
            id: FrameId(id),
            origin: origin.to_string(),
            posted: RefCell::new(Vec::new()),
            focused: Cell::new(0),
            blurred: Cell::new(0),
            torn_down: Cell::new(false),
        })
    }

    pub(crate) fn posted(&self) -> Vec<Envelope> {
        self.posted.borrow().clone()
    }

    pub(crate) fn posted_methods(&self) -> Vec<String> {
        self.posted
            .borrow()
            .iter()
            .map(|e| e.method().to_string())
            .collect()
    }

    pub(crate) fn focused(&self) -> usize {
        self.focused.get()
    }

    pub(crate) fn blurred(&self) -> usize {
        self.blurred.get()
    }

    pub(crate) fn tear_down(&self) {
        self.torn_down.set(true);
    }

    fn check_alive(&self) -> Result<(), BridgeError> {
        if self.torn_down.get() {
            return Err(BridgeError::Frame("content torn down".into()));
        }
        Ok(())
    }
}

impl FrameContent for RecordingFrame {
    fn id(&self) -> FrameId {
        self.id
    }

    fn origin(&self) -> &str {
        &self.origin
    }

    fn post_message(&self, envelope: &Envelope, target_origin: &str) -> Result<(), BridgeError> {
        self.check_alive()?;
        if target_origin != self.origin {
            return Err(BridgeError::OriginMismatch {
                expected: target_origin.to_string(),
                actual: self.origin.clone(),
            });
        }
        self.posted.borrow_mut().push(envelope.clone());
        Ok(())
    }

    fn focus(&self) -> Result<(), BridgeError> {
        self.check_alive()?;
        self.focused.set(self.focused.get() + 1);
        Ok(())
    }

    fn blur(&self) -> Result<(), BridgeError> {
        self.check_alive()?;
        self.blurred.set(self.blurred.get() + 1);
        Ok(())
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// Shared view of everything a [`RecordingSurface`] created.
#[derive(Clone, Default)]
pub(crate) struct SurfaceLog {
    frames: Rc<RefCell<Vec<Rc<RecordingFrame>>>>,
    removed: Rc<RefCell<Vec<FrameId>>>,
    sources: Rc<RefCell<Vec<String>>>,
}

impl SurfaceLog {
    pub(crate) fn frame(&self, index: usize) -> Rc<RecordingFrame> {
        Rc::clone(&self.frames.borrow()[index])
    }

    pub(crate) fn last(&self) -> Rc<RecordingFrame> {
        let frames = self.frames.borrow();
        Rc::clone(frames.last().expect("no frame created"))
    }

    pub(crate) fn count(&self) -> usize {
        self.frames.borrow().len()
    }

    pub(crate) fn removed(&self) -> Vec<FrameId> {
        self.removed.borrow().clone()
    }

    pub(crate) fn sources(&self) -> Vec<String> {
        self.sources.borrow().clone()
    }
}

pub(crate) struct RecordingSurface {
    next_id: u64,
    log: SurfaceLog,
    fail: bool,
}

impl RecordingSurface {
    pub(crate) fn new() -> (Self, SurfaceLog) {
        let log = SurfaceLog::default();
        (
            Self {
                next_id: 1,
                log: log.clone(),
                fail: false,
            },
            log,
        )
    }

    pub(crate) fn failing() -> Self {
        Self {
            next_id: 1,
            log: SurfaceLog::default(),
            fail: true,
        }
    }
}

impl FrameSurface for RecordingSurface {
    fn create_frame(&mut self, src: &str) -> Result<Rc<dyn FrameContent>, BridgeError> {
        if self.fail {
            return Err(BridgeError::Frame("surface unavailable".into()));
        }
        let frame = RecordingFrame::new(self.next_id, &origin_of(src));
        self.next_id += 1;
        self.log.frames.borrow_mut().push(Rc::clone(&frame));
        self.log.sources.borrow_mut().push(src.to_string());
        Ok(frame)
    }

    fn remove_frame(&mut self, frame: FrameId) {
        self.log.removed.borrow_mut().push(frame);
    }
}

// =============================================================================
// DIALOGS
// =============================================================================

/// Dialog collaborator that holds every request until the test completes it.
#[derive(Default)]
pub(crate) struct ScriptedDialogs {
    presented: RefCell<Vec<(DialogRequest, DialogCompletion)>>,
}

impl ScriptedDialogs {
    pub(crate) fn requests(&self) -> Vec<DialogRequest> {
        self.presented
            .borrow()
            .iter()
            .map(|(req, _)| req.clone())
            .collect()
    }

    pub(crate) fn completion(&self, index: usize) -> DialogCompletion {
        self.presented.borrow()[index].1.clone()
    }

    pub(crate) fn count(&self) -> usize {
        self.presented.borrow().len()
    }
}

impl DialogService for ScriptedDialogs {
    fn present(&self, request: DialogRequest, completion: DialogCompletion) {
        self.presented.borrow_mut().push((request, completion));
    }
}

// =============================================================================
// HOST
// =============================================================================

pub(crate) struct TestHost {
    pub(crate) surface: SurfaceLog,
    pub(crate) dialogs: Rc<ScriptedDialogs>,
    pub(crate) windows: RefCell<Vec<(Pid, Rc<HostWindow>)>>,
}

impl TestHost {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            surface: SurfaceLog::default(),
            dialogs: Rc::new(ScriptedDialogs::default()),
            windows: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn window(&self, index: usize) -> Rc<HostWindow> {
        Rc::clone(&self.windows.borrow()[index].1)
    }
}

impl Host for TestHost {
    fn resource(&self, app: &str, path: &str) -> String {
        format!("hostframe://localhost/{app}{path}")
    }

    fn create_window(&self, pid: Pid, options: &WindowOptions) -> Result<WindowParts, BridgeError> {
        let window = Rc::new(HostWindow::new(options.id.clone()));
        self.windows.borrow_mut().push((pid, Rc::clone(&window)));
        let surface = RecordingSurface {
            next_id: 1 + self.surface.count() as u64,
            log: self.surface.clone(),
            fail: false,
        };
        Ok(WindowParts {
            window,
            surface: Box::new(surface),
        })
    }

    fn dialogs(&self) -> Rc<dyn DialogService> {
        self.dialogs.clone()
    }
}

// =============================================================================
// LOG CAPTURE
// =============================================================================

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` and count the warnings it logs.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, count.load(Ordering::SeqCst))
}
