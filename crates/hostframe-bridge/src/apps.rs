//! Applications bundled with the host.

use hostframe_common::BridgeError;
use tracing::debug;

use crate::protocol;
use crate::registry::AppRegistry;
use crate::session::Session;
use crate::window::WindowOptions;

/// Name of the bundled iframe demo.
pub const IFRAME_DEMO: &str = "IframeDemo";

/// Entry document of the demo, relative to its application directory.
pub const IFRAME_DEMO_RESOURCE: &str = "/data/index.html";

/// Register the demo under [`IFRAME_DEMO`], opening `window` and loading
/// `resource` from the demo's content directory.
pub fn register_iframe_demo(
    registry: &mut AppRegistry,
    window: WindowOptions,
    resource: impl Into<String>,
) -> Result<(), BridgeError> {
    let resource = resource.into();
    registry.register(IFRAME_DEMO, move |ctx, args| {
        debug!(app = IFRAME_DEMO, args = %args.args, "launching");
        let session = Session::launch(ctx, IFRAME_DEMO, &window, &resource)?;
        protocol::install(&session)?;
        Ok(session)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostContext, LaunchArgs};
    use crate::testing::TestHost;

    #[test]
    fn demo_launches_with_protocol_installed() {
        let mut registry = AppRegistry::new();
        register_iframe_demo(&mut registry, WindowOptions::default(), IFRAME_DEMO_RESOURCE).unwrap();

        let host = TestHost::new();
        let ctx = HostContext::new(&*host);
        let session = registry
            .launch(IFRAME_DEMO, &ctx, &LaunchArgs::default())
            .unwrap();

        assert_eq!(
            host.surface.sources(),
            vec!["hostframe://localhost/IframeDemo/data/index.html"]
        );
        for method in [protocol::YO, protocol::PING, protocol::CREATE_DIALOG] {
            assert_eq!(session.dispatcher().handler_count(method), 1, "{method}");
        }
        assert_eq!(host.window(0).id(), WindowOptions::default().id);
    }
}
