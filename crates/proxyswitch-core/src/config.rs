// ── Runtime switcher configuration ──
//
// Describes how the switcher talks to the store. Never touches disk:
// proxyswitch-config builds one from settings and hands it in.

use proxyswitch_api::AuthorizationMode;

pub const DEFAULT_SESSION_NAME: &str = "ProxySwitch";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherConfig {
    /// Name given to preferences and dynamic-store sessions.
    pub session_name: String,
    /// Allow the OS credentials prompt when writing.
    pub interactive_auth: bool,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.to_owned(),
            interactive_auth: true,
        }
    }
}

impl SwitcherConfig {
    pub fn write_mode(&self) -> AuthorizationMode {
        if self.interactive_auth {
            AuthorizationMode::Interactive
        } else {
            AuthorizationMode::Silent
        }
    }

    pub(crate) fn monitor_name(&self, purpose: &str) -> String {
        format!("{}-{purpose}", self.session_name)
    }
}
