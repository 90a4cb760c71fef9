//! In-process mock of the FUT web surface.
//!
//! Every request is recorded; replies are looked up by method and path.
//! JSON bodies may contain `{ADDR}`, replaced with the mock's own
//! `host:port` so that the shard host returned by auth points back here.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use futlink_client::{ClientConfig, FutClient};

pub const VERSION: u32 = 17;
pub const EMAIL: &str = "test@test.com";
pub const SID: &str = "94365293-1203-4a49-87d8-3398de0f0355";
pub const PHISHING_TOKEN: &str = "2833763939926856274";

pub const ENTRY: &str = "/fifa/ultimate-team/web-app";
pub const IFRAME: &str = "/iframe/fut17/";
pub const SHARDS: &str = "/iframe/fut17/p/ut/shards/v2";
pub const ACCOUNT_INFO: &str = "/iframe/fut17/p/ut/game/fifa17/user/accountinfo";
pub const AUTH: &str = "/iframe/fut17/p/ut/auth";
pub const PHISHING: &str = "/iframe/fut17/p/ut/game/fifa17/phishing/question";
pub const CREDITS: &str = "/ut/game/fifa17/user/credits";

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Body,
    pub delay: Option<Duration>,
}

#[derive(Debug, Clone)]
pub enum Body {
    Html(String),
    Json(Value),
}

impl Reply {
    pub fn html(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: Body::Html(body.to_string()),
            delay: None,
        }
    }

    pub fn json(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Body::Json(body),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: Body::Json(json!({"code": status, "reason": "mock failure"})),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
}

struct MockState {
    routes: HashMap<(Method, String), Reply>,
    hits: Mutex<Vec<Hit>>,
}

/// Builder for a mock server, pre-loaded with the login fixture.
pub struct MockFut {
    routes: HashMap<(Method, String), Reply>,
}

/// A running mock server.
pub struct RunningMock {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockFut {
    /// All routes of a successful login plus `{credits: 1000}`.
    pub fn fixture() -> Self {
        let mut mock = Self {
            routes: HashMap::new(),
        };
        mock.route(Method::GET, ENTRY, Reply::html(ENTRY_HTML))
            .route(Method::GET, IFRAME, Reply::html(IFRAME_HTML))
            .route(Method::GET, SHARDS, Reply::json(shard_directory()))
            .route(Method::GET, ACCOUNT_INFO, Reply::json(account_info()))
            .route(Method::POST, AUTH, Reply::json(auth_success()))
            .route(Method::GET, PHISHING, Reply::json(phishing_answered()))
            .route(Method::POST, CREDITS, Reply::json(json!({"credits": 1000})));
        mock
    }

    /// An empty mock: every request gets a 404.
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn route(&mut self, method: Method, path: &str, reply: Reply) -> &mut Self {
        self.routes.insert((method, path.to_string()), reply);
        self
    }

    pub async fn start(&self) -> RunningMock {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let routes = self
            .routes
            .iter()
            .map(|(key, reply)| {
                let mut reply = reply.clone();
                if let Body::Json(value) = &reply.body {
                    let text = value.to_string().replace("{ADDR}", &addr.to_string());
                    reply.body = Body::Json(serde_json::from_str(&text).unwrap());
                }
                (key.clone(), reply)
            })
            .collect();

        let state = Arc::new(MockState {
            routes,
            hits: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        RunningMock { addr, state }
    }
}

impl RunningMock {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url(),
            game_version: VERSION,
            request_timeout: Duration::from_secs(5),
            ..ClientConfig::default()
        }
    }

    pub fn client(&self) -> FutClient {
        FutClient::new(&self.config()).unwrap()
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.state.hits.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.hits().into_iter().map(|h| h.path).collect()
    }

    pub fn hit(&self, path: &str) -> Option<Hit> {
        self.hits().into_iter().find(|h| h.path == path)
    }

    pub fn count(&self, path: &str) -> usize {
        self.hits().iter().filter(|h| h.path == path).count()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().to_string();
    state.hits.lock().unwrap().push(Hit {
        method: method.clone(),
        path: path.clone(),
        headers,
    });

    let Some(reply) = state.routes.get(&(method, path)).cloned() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    match reply.body {
        Body::Html(html) => (
            reply.status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Body::Json(value) => (
            reply.status,
            [(header::CONTENT_TYPE, "application/json")],
            value.to_string(),
        )
            .into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const ENTRY_HTML: &str = r"
  <html>
    <head>
      <title>FIFA Football | FUT Web App | EA SPORTS</title>
    </head>
    <body></body>
  </html>
";

pub const IFRAME_HTML: &str = r#"
  <html>
    <head>
      <title>Fifa Ultimate Team</title>
      <script type="text/javascript">
        var HOST_DOMAIN = 'http://www.easports.com/';
        var EASW_ID = '1234567890';
      </script>
    </head>
    <body></body>
  </html>
"#;

pub fn shard_directory() -> Value {
    json!({
        "shardInfo": [
            {
                "shardId": "shard1",
                "clientFacingIpPort": "utas.external.fut.ea.com:443",
                "clientProtocol": "https",
                "platforms": ["xbox", "ios", "and", "360"],
                "customdata1": ["card-360", "card-ios", "card-and"],
                "skus": [
                    "392A0001", "FFA14XBX", "FFA14CAP", "398A0001", "FFA14IOS", "FFA14AND",
                    "FFA14MPC", "FFA14AZN", "FFA15XBX", "FFA15XBO", "FFA15IOS", "FFA15AND",
                    "FFA15MPC", "FFA15AZN"
                ]
            },
            {
                "shardId": "shard2",
                "clientFacingIpPort": "utas.external.s2.fut.ea.com:443",
                "clientProtocol": "https",
                "platforms": ["pc", "ps3"],
                "customdata1": ["card-pc", "card-ps3"],
                "skus": [
                    "395A0001", "FFA14PCC", "391A0001", "FFA14PS3", "FFA14KTL", "FFA15PS3",
                    "FFA15PS4", "FFA15PCC", "FFA16PS3", "FFA16PS4", "FFA16PCC", "FFA17PS4",
                    "FFA17PCC", "FFA17PS3"
                ]
            },
            {
                "shardId": "shard3",
                "clientFacingIpPort": "utas.external.s3.fut.ea.com:443",
                "clientProtocol": "https",
                "platforms": ["xbox", "360"],
                "customdata1": ["card-360"],
                "skus": ["FFA16XBX", "FFA16XBO", "FFA17XBO", "FFA17XBX"]
            }
        ]
    })
}

pub fn account_info() -> Value {
    json!({
        "userAccountInfo": {
            "personas": [{
                "personaId": 123_456_789,
                "personaName": "Tester",
                "returningUser": 0,
                "trial": false,
                "userState": null,
                "userClubList": [{
                    "year": "2017",
                    "assetId": 123_456,
                    "teamId": 123_456,
                    "lastAccessTime": 1_475_974_832,
                    "platform": "360",
                    "clubName": "Test",
                    "clubAbbr": "Tst",
                    "established": 1_475_347_740,
                    "divisionOnline": 1,
                    "badgeId": 1_234_567,
                    "skuAccessList": {"FFA17XBO": 1_475_974_832}
                }]
            }]
        }
    })
}

/// Successful auth whose shard host is the mock itself.
pub fn auth_success() -> Value {
    json!({
        "protocol": "http",
        "ipPort": "{ADDR}",
        "serverTime": "2016-10-09T02:04:44+0000",
        "lastOnlineTime": "2016-10-09T02:04:44+0000",
        "sid": SID
    })
}

pub fn phishing_answered() -> Value {
    json!({
        "debug": "Already answered question.",
        "string": "Already answered question",
        "code": "483",
        "reason": "Already answered question.",
        "token": PHISHING_TOKEN
    })
}
