//! Script side of the bridge.
//!
//! - **frame -> host**: `window.hostframe.send(method, args)` posts a JSON
//!   envelope through `window.ipc.postMessage`, which reaches the WebView's
//!   IPC handler
//! - **host -> frame**: the host evaluates [`deliver_script`], which hands
//!   the envelope to handlers registered with `window.hostframe.on` and
//!   raises a `hostframe:message` DOM event

use hostframe_bridge::Envelope;

/// Injected into every frame before its own scripts run.
pub const FRAME_INIT_SCRIPT: &str = r#"
(function () {
    if (window.hostframe) {
        return;
    }
    var handlers = {};

    function post(envelope) {
        window.ipc.postMessage(JSON.stringify(envelope));
    }

    window.hostframe = {
        send: function (method, args) {
            post({ method: String(method), args: Array.isArray(args) ? args : [] });
        },
        postMessage: post,
        on: function (method, callback) {
            (handlers[method] = handlers[method] || []).push(callback);
        },
        off: function (method, callback) {
            var list = handlers[method] || [];
            var i = list.indexOf(callback);
            if (i >= 0) {
                list.splice(i, 1);
            }
        },
        _receive: function (envelope) {
            var list = (handlers[envelope.method] || []).slice();
            for (var i = 0; i < list.length; i++) {
                try {
                    list[i].apply(null, envelope.args);
                } catch (e) {
                    console.error('hostframe handler failed', envelope.method, e);
                }
            }
            window.dispatchEvent(new CustomEvent('hostframe:message', { detail: envelope }));
        }
    };
})();
"#;

/// Script that delivers `envelope` to the frame.
pub fn deliver_script(envelope: &Envelope) -> String {
    format!(
        "window.hostframe && window.hostframe._receive({});",
        envelope.to_json()
    )
}
