//! Capability handles for embedded frame content.

use std::rc::Rc;

use hostframe_common::{BridgeError, FrameId};
use url::Url;

use crate::envelope::Envelope;

/// The only operations the host may perform on loaded frame content.
///
/// The content is untrusted, so the handle exposes focus, blur and message
/// posting and nothing else.
pub trait FrameContent {
    /// Identity of this content instance.
    fn id(&self) -> FrameId;

    /// Origin the content was loaded from (`scheme://host[:port]`).
    fn origin(&self) -> &str;

    /// Deliver an envelope to the content. Implementations must refuse
    /// delivery when the content no longer lives at `target_origin`.
    fn post_message(&self, envelope: &Envelope, target_origin: &str) -> Result<(), BridgeError>;

    fn focus(&self) -> Result<(), BridgeError>;

    fn blur(&self) -> Result<(), BridgeError>;
}

/// The content area of a host window, able to host embedded frames.
pub trait FrameSurface {
    /// Create a frame pointed at `src` and insert it into the content area.
    fn create_frame(&mut self, src: &str) -> Result<Rc<dyn FrameContent>, BridgeError>;

    /// Remove a previously created frame from the content area.
    fn remove_frame(&mut self, frame: FrameId);
}

/// Where an inbound message claims to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSource {
    pub frame: FrameId,
    pub origin: String,
}

impl InboundSource {
    pub fn new(frame: FrameId, origin: impl Into<String>) -> Self {
        Self {
            frame,
            origin: origin.into(),
        }
    }
}

const OPAQUE_ORIGIN: &str = "null";

/// Reduce a URL to its origin.
///
/// Web schemes use the standard tuple origin (userinfo dropped, default
/// ports elided). Other schemes with a host, such as the content protocol,
/// reduce to `scheme://host[:port]`. Anything else, including URLs that do
/// not parse, has the opaque origin `"null"`.
pub fn origin_of(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return OPAQUE_ORIGIN.to_string();
    };
    let origin = parsed.origin();
    if origin.is_tuple() {
        return origin.ascii_serialization();
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => match parsed.port() {
            Some(port) => format!("{}://{}:{port}", parsed.scheme(), host.to_ascii_lowercase()),
            None => format!("{}://{}", parsed.scheme(), host.to_ascii_lowercase()),
        },
        _ => OPAQUE_ORIGIN.to_string(),
    }
}
