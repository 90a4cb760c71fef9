//! Account actions and the store they are applied to.
//!
//! Operations never touch shared state directly. They return
//! [`AccountAction`] values, and the caller dispatches them into whatever
//! implements [`Dispatch`]: an [`AccountStore`], or a plain `Vec` when only
//! the sequence of actions matters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FutError;
use crate::session::Session;

pub const SET_ACCOUNT_INFO: &str = "SET_ACCOUNT_INFO";
pub const SET_CREDITS: &str = "SET_CREDITS";
pub const SET_SESSION: &str = "SET_SESSION";
pub const NAVIGATE: &str = "NAVIGATE";

/// Route pushed after a successful login.
pub const PLAYERS_ROUTE: &str = "/players";

/// A state update produced by a client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountAction {
    SetAccountInfo { key: String, value: String },
    SetCredits { credits: u64 },
    SetSession { session: Box<Session> },
    Navigate { path: String },
}

impl AccountAction {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetAccountInfo { .. } => SET_ACCOUNT_INFO,
            Self::SetCredits { .. } => SET_CREDITS,
            Self::SetSession { .. } => SET_SESSION,
            Self::Navigate { .. } => NAVIGATE,
        }
    }
}

pub fn set_account_info(key: impl Into<String>, value: impl Into<String>) -> AccountAction {
    AccountAction::SetAccountInfo {
        key: key.into(),
        value: value.into(),
    }
}

pub const fn set_credits(credits: u64) -> AccountAction {
    AccountAction::SetCredits { credits }
}

pub fn set_session(session: Session) -> AccountAction {
    AccountAction::SetSession {
        session: Box::new(session),
    }
}

pub fn navigate(path: impl Into<String>) -> AccountAction {
    AccountAction::Navigate { path: path.into() }
}

/// Sink for account actions.
pub trait Dispatch {
    fn dispatch(&mut self, action: AccountAction);
}

/// Records actions in order.
impl Dispatch for Vec<AccountAction> {
    fn dispatch(&mut self, action: AccountAction) {
        self.push(action);
    }
}

/// Flat per-account state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    #[serde(default)]
    pub info: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

impl AccountState {
    pub fn email(&self) -> Option<&str> {
        self.info.get("email").map(String::as_str)
    }
}

/// Account store: the active account plus any others seen before.
///
/// Setting the `email` key to a different address parks the active account
/// and switches to the one with that address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStore {
    #[serde(default)]
    pub account: AccountState,
    #[serde(default)]
    pub others: BTreeMap<String, AccountState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: AccountAction) {
        debug!(kind = action.kind(), "applying account action");
        match action {
            AccountAction::SetAccountInfo { key, value } => {
                if key == "email" && self.account.email() != Some(value.as_str()) {
                    self.switch_to(&value);
                }
                self.account.info.insert(key, value);
            }
            AccountAction::SetCredits { credits } => self.account.credits = Some(credits),
            AccountAction::SetSession { session } => self.account.session = Some(*session),
            AccountAction::Navigate { path } => self.route = Some(path),
        }
    }

    fn switch_to(&mut self, email: &str) {
        // An anonymous active account simply takes the address.
        if self.account.email().is_none() && !self.others.contains_key(email) {
            return;
        }
        let next = self.others.remove(email).unwrap_or_default();
        let prev = std::mem::replace(&mut self.account, next);
        if let Some(prev_email) = prev.email() {
            self.others.insert(prev_email.to_string(), prev);
        }
    }

    /// State for `email`, whether active or parked.
    pub fn get(&self, email: &str) -> Option<&AccountState> {
        if self.account.email() == Some(email) {
            Some(&self.account)
        } else {
            self.others.get(email)
        }
    }

    /// Session previously established for `email`.
    pub fn session_for(&self, email: &str) -> Result<&Session, FutError> {
        self.get(email)
            .and_then(|a| a.session.as_ref())
            .ok_or_else(|| FutError::NoSession(email.to_string()))
    }

    /// Session of the active account.
    pub fn active_session(&self) -> Result<&Session, FutError> {
        self.account
            .session
            .as_ref()
            .ok_or_else(|| FutError::NoSession(self.account.email().unwrap_or("<none>").into()))
    }

    /// All known accounts, active first.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountState> {
        std::iter::once(&self.account)
            .filter(|a| a.email().is_some())
            .chain(self.others.values())
    }

    /// Forget `email`. Returns its state if it was known.
    ///
    /// Removing the active account also clears the route.
    pub fn remove(&mut self, email: &str) -> Option<AccountState> {
        if self.account.email() == Some(email) {
            self.route = None;
            Some(std::mem::take(&mut self.account))
        } else {
            self.others.remove(email)
        }
    }
}

impl Dispatch for AccountStore {
    fn dispatch(&mut self, action: AccountAction) {
        self.apply(action);
    }
}
