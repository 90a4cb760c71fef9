//! FUT web app HTTP client.
//!
//! Wraps a reqwest client with the web app origin, game version and request
//! timeout. Every request goes through [`FutClient::send`], which races it
//! against a cancellation token and classifies failures by pipeline [`Step`].

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futlink_core::config::ClientSettings;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{FutError, Step};

/// Configuration for connecting to the FUT web app.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Web app origin (e.g., "<https://www.easports.com>").
    pub base_url: String,
    /// Game year; selects `fut{v}` / `fifa{v}` path segments.
    pub game_version: u32,
    pub locale: String,
    /// Upper bound for each individual HTTP request.
    pub request_timeout: Duration,
    /// Explicit caller-platform to shard-platform mapping.
    pub platform_aliases: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

impl From<&ClientSettings> for ClientConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            game_version: settings.game_version,
            locale: settings.locale.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            platform_aliases: settings.platform_aliases.clone(),
        }
    }
}

/// FUT web app client.
#[derive(Debug, Clone)]
pub struct FutClient {
    pub(crate) http: reqwest::Client,
    pub(crate) config: ClientConfig,
    base_url: String,
}

impl FutClient {
    /// Create a new FUT client.
    pub fn new(config: &ClientConfig) -> Result<Self, FutError> {
        if config.base_url.is_empty() {
            return Err(FutError::Config("base_url is empty".into()));
        }
        if config.game_version == 0 {
            return Err(FutError::Config("game_version must be non-zero".into()));
        }
        if config.request_timeout.is_zero() {
            return Err(FutError::Config("request timeout must be non-zero".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/html, */*"));

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // The `Err` case just means it was already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("futlink/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| FutError::Config(format!("failed to build HTTP client: {e}")))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            config: config.clone(),
            base_url,
        })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL of the web app entry page.
    pub(crate) fn web_app_url(&self) -> String {
        format!("{}/fifa/ultimate-team/web-app", self.base_url)
    }

    /// URL under the versioned iframe, e.g. `/iframe/fut17/p/ut/auth`.
    pub(crate) fn iframe_url(&self, path: &str) -> String {
        format!("{}/iframe/fut{}{}", self.base_url, self.config.game_version, path)
    }

    /// Game API path, e.g. `/p/ut/game/fifa17/user/accountinfo`.
    pub(crate) fn game_path(&self, path: &str) -> String {
        format!("/p/ut/game/fifa{}{}", self.config.game_version, path)
    }

    /// Send `request`, racing it against `cancel`.
    pub(crate) async fn send(
        step: Step,
        request: reqwest::RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, FutError> {
        if cancel.is_cancelled() {
            return Err(FutError::Cancelled);
        }
        let resp = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(FutError::Cancelled),
            resp = request.send() => resp.map_err(|e| FutError::from_reqwest(step, e))?,
        };
        debug!(step = %step, status = resp.status().as_u16(), url = %resp.url(), "FUT response");
        Ok(resp)
    }

    /// Check HTTP response status, returning error for non-success codes.
    pub(crate) fn check_status(step: Step, resp: &reqwest::Response) -> Result<(), FutError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(FutError::Status {
                step,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Read the body as text.
    pub(crate) async fn read_text(
        step: Step,
        resp: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<String, FutError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FutError::Cancelled),
            body = resp.text() => body.map_err(|e| FutError::from_reqwest(step, e)),
        }
    }

    /// Read the body as JSON of type `T`.
    pub(crate) async fn read_json<T: DeserializeOwned>(
        step: Step,
        resp: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<T, FutError> {
        let body = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(FutError::Cancelled),
            body = resp.bytes() => body.map_err(|e| FutError::from_reqwest(step, e))?,
        };
        serde_json::from_slice(&body).map_err(|e| FutError::unexpected(step, e.to_string()))
    }
}

/// Millisecond timestamp used as the `_` cache-busting query parameter.
pub(crate) fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}
