//! FUT web app request and response types.
//!
//! Deserialization structs matching the JSON served under `/iframe/fut{v}/p/ut`.
//! Only the fields the client reads are modelled; everything else is ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Response of `GET /iframe/fut{v}/p/ut/shards/v2`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardDirectory {
    #[serde(default)]
    pub shard_info: Vec<Shard>,
}

/// A backend partition serving a set of platforms and SKUs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shard {
    pub shard_id: String,
    pub client_facing_ip_port: String,
    pub client_protocol: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub customdata1: Vec<String>,
    #[serde(default)]
    pub skus: Vec<String>,
}

impl Shard {
    /// `{protocol}://{host:port}` of this shard, as used in `X-UT-Route`.
    pub fn route(&self) -> String {
        format!("{}://{}", self.client_protocol, self.client_facing_ip_port)
    }
}

/// Response of `GET .../user/accountinfo`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfoResponse {
    pub user_account_info: UserAccountInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserAccountInfo {
    #[serde(default)]
    pub personas: Vec<Persona>,
}

/// A persona (in-game identity) attached to the EA account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub persona_id: u64,
    pub persona_name: String,
    #[serde(default)]
    pub returning_user: u32,
    #[serde(default)]
    pub trial: bool,
    #[serde(default)]
    pub user_club_list: Vec<Club>,
}

/// Club entry of a persona (subset of fields).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub year: String,
    #[serde(default)]
    pub platform: String,
    pub club_name: String,
    #[serde(default)]
    pub club_abbr: String,
    #[serde(default)]
    pub established: u64,
    #[serde(default)]
    pub sku_access_list: BTreeMap<String, u64>,
}

/// Body of `POST /iframe/fut{v}/p/ut/auth`.
///
/// Deliberately not `Debug`: it carries the password and secret.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub secret: &'a str,
    pub persona_id: u64,
    pub persona_name: &'a str,
    pub sku: String,
    pub game_sku: String,
    pub client_version: u32,
    pub locale: &'a str,
    pub is_read_only: bool,
}

/// Response of `POST /iframe/fut{v}/p/ut/auth`.
///
/// A successful login carries `sid`; a rejected one carries `code`/`reason`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub protocol: String,
    pub ip_port: String,
    pub server_time: String,
    pub last_online_time: String,
    pub sid: Option<String>,
    #[serde(deserialize_with = "code_string")]
    pub code: Option<String>,
    pub reason: Option<String>,
}

/// Response of `GET .../phishing/question`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhishingResponse {
    #[serde(deserialize_with = "code_string")]
    pub code: Option<String>,
    pub reason: Option<String>,
    pub string: Option<String>,
    pub debug: Option<String>,
    pub token: Option<String>,
    pub question: Option<serde_json::Value>,
}

/// Response of `POST .../user/credits`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsResponse {
    pub credits: u64,
}

/// FUT sends error codes both as `"483"` and `483`.
fn code_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
