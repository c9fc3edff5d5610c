use std::collections::HashMap;

use base64ct::{Base64, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RelayError, RelayResult};
use crate::models::conversation::ConversationHistory;

/// Claims tried in order when looking for a name to log for the caller.
pub const DISPLAY_NAME_CLAIMS: [&str; 2] = ["email", "cognito:username"];

/// Invocation event as delivered by the gateway. Only the fields the relay reads are modelled.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    #[serde(default)]
    pub request_context: Option<RequestContext>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct RequestContext {
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct Authorizer {
    #[serde(default)]
    pub claims: Option<Claims>,
}

/// Identity claims asserted by the upstream authenticator. Trusted as is and only ever logged.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct Claims(HashMap<String, Value>);

impl Claims {
    /// First non-empty string value among [`DISPLAY_NAME_CLAIMS`].
    pub fn display_name(&self) -> Option<&str> {
        DISPLAY_NAME_CLAIMS.iter().find_map(|key| {
            self.0
                .get(*key)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
    }
}

impl From<HashMap<String, Value>> for Claims {
    fn from(claims: HashMap<String, Value>) -> Self {
        Self(claims)
    }
}

/// JSON document carried in the event body.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Option<ConversationHistory>,
}

impl InvocationEvent {
    pub fn claims(&self) -> Option<&Claims> {
        self.request_context
            .as_ref()?
            .authorizer
            .as_ref()?
            .claims
            .as_ref()
    }

    /// Decodes and parses the body into a [`ChatRequest`].
    pub fn chat_request(&self) -> RelayResult<ChatRequest> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| RelayError::InputParse("Request body is missing".into()))?;

        if self.is_base64_encoded.unwrap_or(false) {
            let bytes = Base64::decode_vec(body.trim()).map_err(|e| {
                RelayError::InputParse(format!("Invalid base64 request body: {}", e))
            })?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Ok(serde_json::from_str(body)?)
        }
    }
}
