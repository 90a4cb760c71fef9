//! Tests for the FUT client and response types.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use super::client::{ClientConfig, FutClient};
use super::error::{ErrorKind, FutError, Step};
use super::session::Session;
use super::types::{AccountInfoResponse, ShardDirectory};

fn config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.into(),
        ..ClientConfig::default()
    }
}

// =============================================================================
// Client construction tests
// =============================================================================

#[test]
fn empty_base_url_returns_config_error() {
    let err = FutClient::new(&config("")).unwrap_err();
    assert!(matches!(err, FutError::Config(_)));
}

#[test]
fn zero_game_version_returns_config_error() {
    let cfg = ClientConfig {
        game_version: 0,
        ..config("https://www.easports.com")
    };
    assert!(matches!(FutClient::new(&cfg), Err(FutError::Config(_))));
}

#[test]
fn zero_timeout_returns_config_error() {
    let cfg = ClientConfig {
        request_timeout: Duration::ZERO,
        ..config("https://www.easports.com")
    };
    assert!(matches!(FutClient::new(&cfg), Err(FutError::Config(_))));
}

#[test]
fn default_config_creates_client() {
    let client = FutClient::new(&ClientConfig::default()).unwrap();
    assert_eq!(client.config().game_version, 17);
    assert_eq!(client.config().request_timeout, Duration::from_secs(30));
}

#[test]
fn trailing_slash_stripped_from_base_url() {
    let client = FutClient::new(&config("https://www.easports.com/")).unwrap();
    assert_eq!(
        client.web_app_url(),
        "https://www.easports.com/fifa/ultimate-team/web-app"
    );
}

#[test]
fn iframe_and_game_paths_use_version() {
    let client = FutClient::new(&config("https://www.easports.com")).unwrap();
    assert_eq!(
        client.iframe_url("/p/ut/shards/v2"),
        "https://www.easports.com/iframe/fut17/p/ut/shards/v2"
    );
    assert_eq!(
        client.iframe_url(&client.game_path("/phishing/question")),
        "https://www.easports.com/iframe/fut17/p/ut/game/fifa17/phishing/question"
    );
}

#[test]
fn credits_url_targets_session_host() {
    let client = FutClient::new(&config("https://www.easports.com")).unwrap();
    let session = Session {
        sid: "sid".into(),
        email: "test@test.com".into(),
        platform: "xone".into(),
        protocol: "https".into(),
        host: "utas.external.s3.fut.ea.com:443".into(),
        persona_id: 1,
        persona_name: "Tester".into(),
        phishing_token: None,
        server_time: String::new(),
        last_online_time: String::new(),
        app_id: String::new(),
    };
    assert_eq!(
        client.credits_url(&session),
        "https://utas.external.s3.fut.ea.com:443/ut/game/fifa17/user/credits"
    );
}

// =============================================================================
// Deserialization tests
// =============================================================================

#[test]
fn deserialize_shard_directory() {
    let json = r#"{
        "shardInfo": [{
            "shardId": "shard2",
            "clientFacingIpPort": "utas.external.s2.fut.ea.com:443",
            "clientProtocol": "https",
            "platforms": ["pc", "ps3"],
            "customdata1": ["card-pc", "card-ps3"],
            "skus": ["FFA17PCC", "FFA17PS3"]
        }]
    }"#;
    let dir: ShardDirectory = serde_json::from_str(json).unwrap();
    let shard = &dir.shard_info[0];
    assert_eq!(shard.shard_id, "shard2");
    assert_eq!(shard.client_facing_ip_port, "utas.external.s2.fut.ea.com:443");
    assert_eq!(shard.platforms, vec!["pc", "ps3"]);
    assert_eq!(shard.customdata1.len(), 2);
    assert_eq!(shard.route(), "https://utas.external.s2.fut.ea.com:443");
}

#[test]
fn deserialize_shard_minimal() {
    let json = r#"{"shardInfo": [{"shardId": "s", "clientFacingIpPort": "h:1", "clientProtocol": "https"}]}"#;
    let dir: ShardDirectory = serde_json::from_str(json).unwrap();
    assert!(dir.shard_info[0].platforms.is_empty());
    assert!(dir.shard_info[0].skus.is_empty());
}

#[test]
fn deserialize_account_info() {
    let json = r#"{
        "userAccountInfo": {
            "personas": [{
                "personaId": 123456789,
                "personaName": "Tester",
                "returningUser": 0,
                "trial": false,
                "userState": null,
                "userClubList": [{
                    "year": "2017",
                    "assetId": 123456,
                    "teamId": 123456,
                    "lastAccessTime": 1475974832,
                    "platform": "360",
                    "clubName": "Test",
                    "clubAbbr": "Tst",
                    "established": 1475347740,
                    "divisionOnline": 1,
                    "badgeId": 1234567,
                    "skuAccessList": {"FFA17XBO": 1475974832}
                }]
            }]
        }
    }"#;
    let info: AccountInfoResponse = serde_json::from_str(json).unwrap();
    let persona = &info.user_account_info.personas[0];
    assert_eq!(persona.persona_id, 123_456_789);
    assert_eq!(persona.persona_name, "Tester");
    let club = &persona.user_club_list[0];
    assert_eq!(club.club_name, "Test");
    assert_eq!(club.sku_access_list["FFA17XBO"], 1_475_974_832);
}

// =============================================================================
// Error display tests
// =============================================================================

#[test]
fn error_display_names_step() {
    let err = FutError::Status {
        step: Step::Shards,
        status: 503,
    };
    assert_eq!(err.to_string(), "unexpected HTTP status 503 (shard directory)");
    assert!(err.is_service_unavailable());
}

#[test]
fn error_kinds_are_distinct() {
    assert_eq!(
        FutError::UnsupportedPlatform("xone".into()).kind(),
        ErrorKind::UnsupportedPlatform
    );
    assert_eq!(
        FutError::AuthRejected {
            code: "461".into(),
            reason: "denied".into()
        }
        .kind(),
        ErrorKind::AuthRejected
    );
    assert_eq!(
        FutError::Timeout { step: Step::Auth }.kind(),
        ErrorKind::Timeout
    );
    assert!(!FutError::Cancelled.is_service_unavailable());
}

#[test]
fn unexpected_response_display() {
    let err = FutError::UnexpectedResponse {
        step: Step::Iframe,
        detail: "EASW_ID not found".into(),
    };
    assert_eq!(
        err.to_string(),
        "unexpected response shape (iframe page): EASW_ID not found"
    );
}
