use std::collections::BTreeMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorBody, RelayError};
use crate::models::conversation::ConversationHistory;

pub const CORS_ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const CORS_ALLOW_METHODS: &str = "OPTIONS,POST";

lazy_static! {
    /// Headers attached to every response, successful or not.
    static ref RESPONSE_HEADERS: BTreeMap<String, String> = BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Headers".to_string(), CORS_ALLOW_HEADERS.to_string()),
        ("Access-Control-Allow-Methods".to_string(), CORS_ALLOW_METHODS.to_string()),
    ]);
}

/// Response handed back to the gateway. `body` holds the JSON encoded [`ChatResponse`] or
/// [`ErrorBody`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub conversation_history: ConversationHistory,
}

impl ChatResponse {
    pub fn new(response: String, conversation_history: ConversationHistory) -> Self {
        Self {
            success: true,
            response,
            conversation_history,
        }
    }
}

impl GatewayResponse {
    pub fn success(chat: &ChatResponse) -> Self {
        Self::json(200, chat)
    }

    pub fn failure(err: &RelayError) -> Self {
        Self::json(500, &ErrorBody::from(err))
    }

    fn json(status_code: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": e.to_string() }).to_string()
        });
        Self {
            status_code,
            headers: RESPONSE_HEADERS.clone(),
            body,
        }
    }
}
