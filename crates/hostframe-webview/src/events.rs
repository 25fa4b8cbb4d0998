//! Frame events raised by WebView callbacks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use hostframe_common::FrameId;

/// State of a page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// The frame's document finished loading.
    Ready { frame: FrameId, url: String },
    /// A loaded frame started loading another document.
    Unloaded { frame: FrameId, url: String },
    /// Raw message posted by the frame's script.
    Message {
        frame: FrameId,
        origin: String,
        body: String,
    },
    /// The frame tried to leave the navigation allowlist.
    NavigationBlocked { frame: FrameId, url: String },
}

impl FrameEvent {
    pub fn frame(&self) -> FrameId {
        match self {
            FrameEvent::Ready { frame, .. }
            | FrameEvent::Unloaded { frame, .. }
            | FrameEvent::Message { frame, .. }
            | FrameEvent::NavigationBlocked { frame, .. } => *frame,
        }
    }
}

/// Queue shared between WebView callbacks and the event loop.
#[derive(Debug, Clone, Default)]
pub struct FrameEvents {
    queue: Arc<Mutex<Vec<FrameEvent>>>,
}

impl FrameEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: FrameEvent) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<FrameEvent> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

/// Turns one WebView's page-load callbacks into ready/unload transitions.
#[derive(Debug)]
pub(crate) struct LoadTracker {
    frame: FrameId,
    loaded: AtomicBool,
}

impl LoadTracker {
    pub(crate) fn new(frame: FrameId) -> Self {
        Self {
            frame,
            loaded: AtomicBool::new(false),
        }
    }

    pub(crate) fn on_page_load(&self, state: PageLoadState, url: String) -> Option<FrameEvent> {
        match state {
            PageLoadState::Finished if !self.loaded.swap(true, Ordering::SeqCst) => {
                Some(FrameEvent::Ready {
                    frame: self.frame,
                    url,
                })
            }
            PageLoadState::Started if self.loaded.swap(false, Ordering::SeqCst) => {
                Some(FrameEvent::Unloaded {
                    frame: self.frame,
                    url,
                })
            }
            _ => None,
        }
    }
}
