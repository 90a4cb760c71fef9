//! futlink client
//!
//! Client for the FIFA Ultimate Team web app:
//! - Login pipeline (iframe scraping, shard selection, auth, phishing check)
//! - Credits lookup on the session's shard host
//! - Account actions and the store they apply to

pub mod actions;
mod client;
mod credits;
pub mod error;
pub mod login;
pub mod scrape;
pub mod session;
pub mod shards;
pub mod types;

#[cfg(test)]
mod tests;

pub use actions::{AccountAction, AccountState, AccountStore, Dispatch};
pub use client::{ClientConfig, FutClient};
pub use error::{ErrorKind, FutError, Step};
pub use login::LoginOutcome;
pub use session::{Credentials, Session};
pub use tokio_util::sync::CancellationToken;
