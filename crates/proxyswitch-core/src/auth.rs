// ── Authorization capability ──
//
// Holds the store's authorization once it has been granted. The first
// successful acquisition wins and is reused for the rest of the process;
// failures are not cached, so a later interactive attempt may still
// succeed after a silent one was refused.

use std::sync::OnceLock;

use proxyswitch_api::{AuthorizationMode, Error as ApiError, SystemStore};
use tracing::{debug, warn};

/// Environment variable set inside an App Sandbox container.
const SANDBOX_CONTAINER_VAR: &str = "APP_SANDBOX_CONTAINER_ID";

pub struct Authorizer<S: SystemStore> {
    granted: OnceLock<S::Authorization>,
}

impl<S: SystemStore> Default for Authorizer<S> {
    fn default() -> Self {
        Self {
            granted: OnceLock::new(),
        }
    }
}

impl<S: SystemStore> Authorizer<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_granted(&self) -> bool {
        self.granted.get().is_some()
    }

    /// Return the cached authorization or acquire one from `store`.
    pub fn acquire(
        &self,
        store: &S,
        mode: AuthorizationMode,
    ) -> Result<&S::Authorization, ApiError> {
        if let Some(granted) = self.granted.get() {
            return Ok(granted);
        }
        if mode == AuthorizationMode::Interactive && is_sandboxed() {
            warn!("running inside an App Sandbox; editing network preferences will likely fail");
        }
        let authorization = store.authorize(mode)?;
        debug!(?mode, "authorization granted");
        Ok(self.granted.get_or_init(|| authorization))
    }
}

fn is_sandboxed() -> bool {
    std::env::var_os(SANDBOX_CONTAINER_VAR).is_some()
}
