//! RCON endpoint configuration.

use std::fmt;

/// Host used when `RCON_IP` is not set.
pub const DEFAULT_RCON_HOST: &str = "localhost";

/// Where the RCON WebSocket lives and how to authenticate.
///
/// Port and password are optional on purpose: a missing value produces a
/// URI that fails to connect, which the reconnect loop already handles.
#[derive(Clone, PartialEq, Eq)]
pub struct RconConfig {
    pub host: String,
    pub port: Option<String>,
    pub password: Option<String>,
}

impl RconConfig {
    pub fn new(host: impl Into<String>, port: Option<String>, password: Option<String>) -> Self {
        Self {
            host: host.into(),
            port,
            password,
        }
    }

    /// `ws://host:port/password`; the password is the whole path.
    pub fn uri(&self) -> String {
        format!(
            "ws://{}:{}/{}",
            self.host,
            self.port.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default()
        )
    }

    /// The URI with the password masked, for logs.
    pub fn redacted_uri(&self) -> String {
        let secret = if self.password.is_some() { "***" } else { "" };
        format!(
            "ws://{}:{}/{}",
            self.host,
            self.port.as_deref().unwrap_or_default(),
            secret
        )
    }
}

impl Default for RconConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RCON_HOST, None, None)
    }
}

impl fmt::Debug for RconConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RconConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
