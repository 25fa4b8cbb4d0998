//! `wry` backend for the frame bridge.
//!
//! - [`WryFrameSurface`] creates one child WebView per frame inside a host
//!   window and implements the bridge's `FrameSurface`
//! - [`FrameEvents`] collects ready, unload and message events from WebView
//!   callbacks for the host event loop to drain
//! - [`ContentProvider`] serves bundled application content over the
//!   `hostframe://` custom protocol
//! - [`is_navigation_allowed`] keeps frames on bundled content and
//!   configured origins

pub mod content;
pub mod events;
pub mod ipc;
pub mod navigation;
pub mod surface;

pub use content::ContentProvider;
pub use events::{FrameEvent, FrameEvents, PageLoadState};
pub use navigation::{frame_origin, is_navigation_allowed, CONTENT_ORIGIN};
pub use surface::{fill_bounds, FrameOptions, FrameSet, WryFrame, WryFrameSurface};
