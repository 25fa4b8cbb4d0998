//! Bundled application content over the `hostframe://` custom protocol.
//!
//! A request for `hostframe://localhost/IframeDemo/data/index.html`
//! resolves to `{base_dir}/IframeDemo/data/index.html`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;
use wry::http::Response;

use crate::navigation::CONTENT_ORIGIN;

/// Custom protocol scheme frames load bundled content from.
pub const SCHEME: &str = "hostframe";

pub struct ContentProvider {
    base_dir: PathBuf,
    /// path -> (mime, data)
    overrides: HashMap<String, (String, Vec<u8>)>,
}

impl ContentProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            overrides: HashMap::new(),
        }
    }

    /// Serve `data` for `path` without touching the filesystem.
    pub fn add_override(
        &mut self,
        path: impl Into<String>,
        mime: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        let path = path.into();
        self.overrides.insert(
            path.trim_start_matches('/').to_string(),
            (mime.into(), data.into()),
        );
    }

    /// Resolve a request path to its MIME type and bytes.
    ///
    /// Paths that escape the base directory, including through symlinks,
    /// resolve to nothing.
    pub fn resolve(&self, path: &str) -> Option<(Cow<'_, str>, Cow<'_, [u8]>)> {
        let clean = path.trim_start_matches('/');

        if let Some((mime, data)) = self.overrides.get(clean) {
            return Some((Cow::Borrowed(mime.as_str()), Cow::Borrowed(data.as_slice())));
        }

        let file_path = self.base_dir.join(clean);
        let canonical_base = std::fs::canonicalize(&self.base_dir).ok()?;
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        if !canonical_file.starts_with(&canonical_base) {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        let mime = mime_from_extension(&file_path);
        Some((Cow::Borrowed(mime), Cow::Owned(data)))
    }

    /// Answer a custom protocol request for `uri`.
    pub fn respond(&self, uri: &str) -> Response<Cow<'static, [u8]>> {
        let path = request_path(uri);
        match self.resolve(path) {
            Some((mime, data)) => build_response(200, &mime, data.into_owned()),
            None => {
                warn!(path, "custom protocol: asset not found");
                build_response(404, "text/plain", b"Not Found".to_vec())
            }
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Path part of a custom protocol URI, without query or fragment.
pub fn request_path(uri: &str) -> &str {
    let path = uri
        .strip_prefix("hostframe://localhost")
        .or_else(|| uri.strip_prefix("http://hostframe.localhost"))
        .or_else(|| uri.strip_prefix("hostframe://"))
        .unwrap_or("");
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.trim_start_matches('/')
}

fn build_response(status: u16, mime: &str, body: Vec<u8>) -> Response<Cow<'static, [u8]>> {
    Response::builder()
        .status(status)
        .header("Content-Type", mime)
        .header("Access-Control-Allow-Origin", CONTENT_ORIGIN)
        .body(Cow::Owned(body))
        .unwrap_or_else(|e| {
            warn!(error = %e, "custom protocol: failed to build response");
            Response::new(Cow::Borrowed(&b""[..]))
        })
}

fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff2") => "font/woff2",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
