//! Session state: server root, bearer token and the authenticated principal

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The logged-in user as returned by `accounts/login`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Session token sent as the `Authorization` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apitoken: Option<String>,
    /// Profile fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-facade session. Cloned into every resource handle as a snapshot.
#[derive(Debug, Clone)]
pub struct Session {
    /// `{scheme}://{host}/api/{version}`
    pub server: String,
    pub token: Option<String>,
    pub me: Option<Principal>,
}

impl Session {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            token: None,
            me: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store the principal and adopt its token for all later requests
    pub fn authenticate(&mut self, me: Principal) {
        self.token = me.token.clone();
        self.me = Some(me);
    }

    /// `{server}/{path}`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.server, path.trim_start_matches('/'))
    }
}
