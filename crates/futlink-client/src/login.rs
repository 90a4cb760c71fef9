//! Login pipeline.
//!
//! Establishes a session in strict order: entry page, iframe constants,
//! shard directory, account info, authentication, phishing question. Each
//! stage consumes the previous stage's output; the first fatal failure ends
//! the login and nothing is dispatched.

use reqwest::header::ORIGIN;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::actions::{self, AccountAction, Dispatch, PLAYERS_ROUTE};
use crate::client::{cache_buster, FutClient};
use crate::error::{FutError, Step};
use crate::scrape;
use crate::session::{Credentials, Session};
use crate::shards;
use crate::types::{
    AccountInfoResponse, AuthRequest, AuthResponse, Persona, PhishingResponse, Shard,
    ShardDirectory,
};

/// FUT code for "Already answered question."
pub const PHISHING_ALREADY_ANSWERED: &str = "483";

const NUCLEUS_ID_HEADER: &str = "Easw-Session-Data-Nucleus-Id";
const ROUTE_HEADER: &str = "X-UT-Route";
pub(crate) const SID_HEADER: &str = "X-UT-SID";
pub(crate) const PHISHING_TOKEN_HEADER: &str = "X-UT-PHISHING-TOKEN";

/// Constants scraped from the iframe page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConstants {
    pub host_domain: String,
    pub app_id: String,
}

impl AppConstants {
    /// `Origin` header value for iframe API calls: the host domain without
    /// its trailing slash.
    pub fn origin(&self) -> &str {
        self.host_domain.trim_end_matches('/')
    }
}

/// Result of a successful login: the session plus the actions to dispatch.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session: Session,
    pub actions: Vec<AccountAction>,
}

impl LoginOutcome {
    /// Dispatch every action, in order.
    pub fn dispatch_into<D: Dispatch + ?Sized>(self, dispatcher: &mut D) -> Session {
        for action in self.actions {
            dispatcher.dispatch(action);
        }
        self.session
    }
}

impl FutClient {
    /// Run the full login sequence for `credentials`.
    pub async fn login(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome, FutError> {
        info!(email = %credentials.email, platform = %credentials.platform, "logging in");

        self.fetch_entry_page(cancel).await?;
        let constants = self.fetch_app_constants(cancel).await?;

        let directory = self.fetch_shards(cancel).await?;
        let shard = shards::select_shard(
            &directory,
            &credentials.platform,
            &self.config.platform_aliases,
        )?;
        info!(shard = %shard.shard_id, host = %shard.client_facing_ip_port, "selected shard");

        let game_sku = shards::game_sku(self.config.game_version, &credentials.platform)
            .unwrap_or_default();
        if !game_sku.is_empty() && !shard.skus.is_empty() && !shard.skus.contains(&game_sku) {
            warn!(shard = %shard.shard_id, sku = %game_sku, "shard does not list game SKU");
        }

        let persona = self.fetch_persona(&constants, shard, cancel).await?;
        let auth = self
            .authenticate(credentials, &constants, shard, &persona, game_sku, cancel)
            .await?;
        let sid = auth
            .sid
            .clone()
            .ok_or_else(|| FutError::unexpected(Step::Auth, "missing sid"))?;

        let phishing_token = self.check_challenge(&sid, cancel).await?;

        let (protocol, host) = if auth.ip_port.is_empty() {
            (
                shard.client_protocol.clone(),
                shard.client_facing_ip_port.clone(),
            )
        } else {
            let protocol = if auth.protocol.is_empty() {
                shard.client_protocol.clone()
            } else {
                auth.protocol.clone()
            };
            (protocol, auth.ip_port.clone())
        };

        let session = Session {
            sid,
            email: credentials.email.clone(),
            platform: credentials.platform.clone(),
            protocol,
            host,
            persona_id: persona.persona_id,
            persona_name: persona.persona_name.clone(),
            phishing_token,
            server_time: auth.server_time,
            last_online_time: auth.last_online_time,
            app_id: constants.app_id,
        };
        info!(persona = %session.persona_name, host = %session.host, "login complete");

        let actions = login_actions(&session);
        Ok(LoginOutcome { session, actions })
    }

    /// Log in and dispatch the resulting actions into `dispatcher`.
    ///
    /// Nothing is dispatched unless the whole sequence succeeds.
    pub async fn login_into<D: Dispatch + ?Sized>(
        &self,
        credentials: &Credentials,
        cancel: &CancellationToken,
        dispatcher: &mut D,
    ) -> Result<Session, FutError> {
        let outcome = self.login(credentials, cancel).await?;
        Ok(outcome.dispatch_into(dispatcher))
    }

    async fn fetch_entry_page(&self, cancel: &CancellationToken) -> Result<(), FutError> {
        let step = Step::EntryPage;
        let resp = Self::send(step, self.http.get(self.web_app_url()), cancel).await?;
        Self::check_status(step, &resp)
    }

    async fn fetch_app_constants(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AppConstants, FutError> {
        let step = Step::Iframe;
        let request = self
            .http
            .get(self.iframe_url("/"))
            .query(&[("locale", self.config.locale.as_str())]);
        let resp = Self::send(step, request, cancel).await?;
        Self::check_status(step, &resp)?;
        let html = Self::read_text(step, resp, cancel).await?;
        parse_app_constants(&html)
    }

    async fn fetch_shards(&self, cancel: &CancellationToken) -> Result<Vec<Shard>, FutError> {
        let step = Step::Shards;
        let request = self
            .http
            .get(self.iframe_url("/p/ut/shards/v2"))
            .query(&[("_", cache_buster())]);
        let resp = Self::send(step, request, cancel).await?;
        Self::check_status(step, &resp)?;
        let directory: ShardDirectory = Self::read_json(step, resp, cancel).await?;
        debug!(count = directory.shard_info.len(), "shard directory");
        Ok(directory.shard_info)
    }

    async fn fetch_persona(
        &self,
        constants: &AppConstants,
        shard: &Shard,
        cancel: &CancellationToken,
    ) -> Result<Persona, FutError> {
        let step = Step::AccountInfo;
        let request = self
            .http
            .get(self.iframe_url(&self.game_path("/user/accountinfo")))
            .query(&[("_", cache_buster())])
            .header(ORIGIN, constants.origin())
            .header(NUCLEUS_ID_HEADER, &constants.app_id)
            .header(ROUTE_HEADER, shard.route());
        let resp = Self::send(step, request, cancel).await?;
        Self::check_status(step, &resp)?;
        let info: AccountInfoResponse = Self::read_json(step, resp, cancel).await?;
        info.user_account_info
            .personas
            .into_iter()
            .next()
            .ok_or_else(|| FutError::unexpected(step, "account has no personas"))
    }

    async fn authenticate(
        &self,
        credentials: &Credentials,
        constants: &AppConstants,
        shard: &Shard,
        persona: &Persona,
        game_sku: String,
        cancel: &CancellationToken,
    ) -> Result<AuthResponse, FutError> {
        let step = Step::Auth;
        let body = AuthRequest {
            email: &credentials.email,
            password: &credentials.password,
            secret: &credentials.secret,
            persona_id: persona.persona_id,
            persona_name: &persona.persona_name,
            sku: shards::web_sku(self.config.game_version),
            game_sku,
            client_version: 1,
            locale: &self.config.locale,
            is_read_only: false,
        };
        let request = self
            .http
            .post(self.iframe_url("/p/ut/auth"))
            .header(ORIGIN, constants.origin())
            .header(NUCLEUS_ID_HEADER, &constants.app_id)
            .header(ROUTE_HEADER, shard.route())
            .json(&body);
        let resp = Self::send(step, request, cancel).await?;

        let status = resp.status();
        if status.is_client_error() {
            let detail: AuthResponse = Self::read_json(step, resp, cancel).await.unwrap_or_default();
            return Err(FutError::AuthRejected {
                code: detail.code.unwrap_or_else(|| status.as_u16().to_string()),
                reason: detail
                    .reason
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").into()),
            });
        }
        Self::check_status(step, &resp)?;

        let auth: AuthResponse = Self::read_json(step, resp, cancel).await?;
        check_auth(auth)
    }

    /// Query the phishing question endpoint.
    ///
    /// Transport and status failures are logged and ignored; an outstanding
    /// unanswered question is fatal.
    async fn check_challenge(
        &self,
        sid: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, FutError> {
        let step = Step::Phishing;
        let request = self
            .http
            .get(self.iframe_url(&self.game_path("/phishing/question")))
            .query(&[("_", cache_buster())])
            .header(SID_HEADER, sid);

        let resp = match Self::send(step, request, cancel).await {
            Ok(resp) => resp,
            Err(FutError::Cancelled) => return Err(FutError::Cancelled),
            Err(e) => {
                warn!(error = %e, "phishing question check failed, continuing");
                return Ok(None);
            }
        };
        if let Err(e) = Self::check_status(step, &resp) {
            warn!(error = %e, "phishing question check failed, continuing");
            return Ok(None);
        }
        match Self::read_json::<PhishingResponse>(step, resp, cancel).await {
            Ok(body) => evaluate_challenge(&body),
            Err(FutError::Cancelled) => Err(FutError::Cancelled),
            Err(e) => {
                warn!(error = %e, "unreadable phishing question response, continuing");
                Ok(None)
            }
        }
    }
}

/// Extract both iframe constants from `html`.
pub fn parse_app_constants(html: &str) -> Result<AppConstants, FutError> {
    let host_domain = scrape::extract_host_domain(html)
        .ok_or_else(|| FutError::unexpected(Step::Iframe, "HOST_DOMAIN not found"))?;
    let app_id = scrape::extract_app_id(html)
        .ok_or_else(|| FutError::unexpected(Step::Iframe, "EASW_ID not found"))?;
    debug!(host_domain, app_id, "scraped iframe constants");
    Ok(AppConstants {
        host_domain: host_domain.to_string(),
        app_id: app_id.to_string(),
    })
}

/// Reject auth bodies that carry an error code instead of a session id.
pub fn check_auth(auth: AuthResponse) -> Result<AuthResponse, FutError> {
    match &auth.sid {
        Some(sid) if !sid.is_empty() => Ok(auth),
        _ => Err(FutError::AuthRejected {
            code: auth.code.unwrap_or_else(|| "unknown".into()),
            reason: auth.reason.unwrap_or_else(|| "no session id returned".into()),
        }),
    }
}

/// Decide what a phishing question response means for the login.
///
/// Returns the phishing token to keep, if any.
pub fn evaluate_challenge(body: &PhishingResponse) -> Result<Option<String>, FutError> {
    if body.code.as_deref() == Some(PHISHING_ALREADY_ANSWERED) {
        debug!("phishing question already answered");
        return Ok(body.token.clone());
    }
    let pending = body.question.as_ref().is_some_and(|q| !q.is_null());
    if pending {
        return Err(FutError::ChallengeUnresolved {
            reason: body
                .reason
                .clone()
                .or_else(|| body.string.clone())
                .unwrap_or_else(|| "security question pending".into()),
        });
    }
    if body.token.is_none() {
        warn!(code = ?body.code, reason = ?body.reason, "phishing response without token");
    }
    Ok(body.token.clone())
}

/// Actions dispatched after a successful login, navigation last.
pub fn login_actions(session: &Session) -> Vec<AccountAction> {
    vec![
        actions::set_account_info("email", &session.email),
        actions::set_account_info("platform", &session.platform),
        actions::set_account_info("personaId", session.persona_id.to_string()),
        actions::set_account_info("personaName", &session.persona_name),
        actions::set_account_info("sid", &session.sid),
        actions::set_account_info("host", &session.host),
        actions::set_session(session.clone()),
        actions::navigate(PLAYERS_ROUTE),
    ]
}
