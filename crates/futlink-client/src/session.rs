//! Login inputs and the session they produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account credentials supplied by the caller.
///
/// Never mutated; `Debug` redacts the password and secret.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub secret: String,
    pub platform: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("platform", &self.platform)
            .finish()
    }
}

/// An authenticated FUT session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Server-issued session id, sent as `X-UT-SID`.
    pub sid: String,
    pub email: String,
    pub platform: String,
    /// Scheme of the shard host (`https`).
    pub protocol: String,
    /// `host:port` of the shard serving this session.
    pub host: String,
    pub persona_id: u64,
    pub persona_name: String,
    /// Token from the phishing question endpoint, sent as `X-UT-PHISHING-TOKEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phishing_token: Option<String>,
    #[serde(default)]
    pub server_time: String,
    #[serde(default)]
    pub last_online_time: String,
    /// `EASW_ID` scraped from the iframe page.
    #[serde(default)]
    pub app_id: String,
}

impl Session {
    /// Origin of the shard host, e.g. `https://utas.external.s3.fut.ea.com:443`.
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.host)
    }
}
