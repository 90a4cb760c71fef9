//! Credits (coin balance) lookup.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::actions::{self, AccountAction, Dispatch};
use crate::client::FutClient;
use crate::error::{FutError, Step};
use crate::login::{PHISHING_TOKEN_HEADER, SID_HEADER};
use crate::session::Session;
use crate::types::CreditsResponse;

impl FutClient {
    /// URL of the credits endpoint on the session's shard host.
    pub(crate) fn credits_url(&self, session: &Session) -> String {
        format!(
            "{}/ut/game/fifa{}/user/credits",
            session.base_url(),
            self.config.game_version
        )
    }

    /// Fetch the coin balance for an established session.
    pub async fn fetch_credits(
        &self,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<u64, FutError> {
        let step = Step::Credits;
        let mut request = self
            .http
            .post(self.credits_url(session))
            .header(SID_HEADER, &session.sid);
        if let Some(token) = &session.phishing_token {
            request = request.header(PHISHING_TOKEN_HEADER, token);
        }
        let resp = Self::send(step, request, cancel).await?;
        Self::check_status(step, &resp)?;
        let body: CreditsResponse = Self::read_json(step, resp, cancel).await?;
        info!(email = %session.email, credits = body.credits, "fetched credits");
        Ok(body.credits)
    }

    /// Fetch the balance as a `SET_CREDITS` action.
    pub async fn credits_action(
        &self,
        session: &Session,
        cancel: &CancellationToken,
    ) -> Result<AccountAction, FutError> {
        self.fetch_credits(session, cancel)
            .await
            .map(actions::set_credits)
    }

    /// Fetch the balance and dispatch exactly one `SET_CREDITS` on success.
    pub async fn refresh_credits<D: Dispatch + ?Sized>(
        &self,
        session: &Session,
        cancel: &CancellationToken,
        dispatcher: &mut D,
    ) -> Result<u64, FutError> {
        let credits = self.fetch_credits(session, cancel).await?;
        dispatcher.dispatch(actions::set_credits(credits));
        Ok(credits)
    }
}
