//! Navigation allowlist and origin normalisation.

use hostframe_bridge::origin_of;

/// Origin of bundled content served over the custom protocol.
pub const CONTENT_ORIGIN: &str = "hostframe://localhost";

/// WebView2 rewrites `hostframe://localhost/...` to this origin.
const WEBVIEW2_ORIGIN: &str = "http://hostframe.localhost";

/// URL prefixes every frame may navigate to.
///
/// - `hostframe://` serves bundled application content
/// - `http://hostframe.localhost/` is the same content under WebView2
/// - `about:blank` is the empty page
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "hostframe://",
    "http://hostframe.localhost/",
    "about:blank",
];

/// Whether a frame may navigate to `url`.
///
/// `extra` holds configured prefixes; an extra prefix without a path only
/// matches that exact origin.
pub fn is_navigation_allowed(url: &str, extra: &[String]) -> bool {
    if url == WEBVIEW2_ORIGIN {
        return true;
    }
    ALLOWED_NAV_PREFIXES
        .iter()
        .copied()
        .chain(extra.iter().map(String::as_str))
        .any(|prefix| matches_prefix(url, prefix))
}

fn matches_prefix(url: &str, prefix: &str) -> bool {
    let Some(rest) = url.strip_prefix(prefix) else {
        return false;
    };
    // "https://a.com" must not admit "https://a.com.evil".
    prefix.ends_with('/')
        || prefix.ends_with("://")
        || prefix.ends_with(':')
        || rest.is_empty()
        || rest.starts_with(['/', '?', '#'])
}

/// Origin of `url` as the bridge sees it, folding the WebView2 rewrite back
/// into [`CONTENT_ORIGIN`].
pub fn frame_origin(url: &str) -> String {
    let origin = origin_of(url);
    if origin == WEBVIEW2_ORIGIN {
        CONTENT_ORIGIN.to_string()
    } else {
        origin
    }
}
