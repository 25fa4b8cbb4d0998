//! Application factories by name.

use std::collections::HashMap;

use hostframe_common::BridgeError;
use tracing::info;

use crate::host::{HostContext, LaunchArgs};
use crate::session::Session;

/// Builds a running session for one application.
pub type AppFactory = Box<dyn Fn(&HostContext<'_>, &LaunchArgs) -> Result<Session, BridgeError>>;

/// Populated at startup and passed to whoever launches applications.
#[derive(Default)]
pub struct AppRegistry {
    factories: HashMap<String, AppFactory>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`. Names are unique.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: impl Fn(&HostContext<'_>, &LaunchArgs) -> Result<Session, BridgeError> + 'static,
    ) -> Result<(), BridgeError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(BridgeError::DuplicateApplication(name));
        }
        self.factories.insert(name, Box::new(factory));
        Ok(())
    }

    /// Look up `name` and run its factory.
    pub fn launch(
        &self,
        name: &str,
        ctx: &HostContext<'_>,
        args: &LaunchArgs,
    ) -> Result<Session, BridgeError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| BridgeError::UnknownApplication(name.to_string()))?;
        let session = factory(ctx, args)?;
        info!(app = name, pid = %session.pid(), "application launched");
        Ok(session)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
