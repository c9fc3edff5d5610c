use serde_json::Value;
use tracing::{error, info};

use crate::api::generation::GenerationClient;
use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::models::event::InvocationEvent;
use crate::models::generation::GenerationRequest;
use crate::models::response::{ChatResponse, GatewayResponse};

/// Forwards chat messages to the generation endpoint. Holds no per-invocation state, so a single
/// instance serves every invocation of the process.
#[derive(Clone, Debug)]
pub struct Relay {
    config: Config,
    client: GenerationClient,
}

impl Relay {
    pub fn new(config: Config) -> RelayResult<Self> {
        let client = GenerationClient::new(config.fastapi_endpoint())?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: GenerationClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handles one raw invocation payload. Never fails: every error is turned into a 500
    /// response carrying its message.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn handle(&self, payload: Value) -> GatewayResponse {
        info!(event = %payload, "Received event");

        let result = match serde_json::from_value::<InvocationEvent>(payload) {
            Ok(event) => self.handle_event(&event).await,
            Err(err) => Err(RelayError::from(err)),
        };

        match result {
            Ok(chat) => GatewayResponse::success(&chat),
            Err(err) => {
                error!(kind = err.kind(), error = %err, "Invocation failed");
                GatewayResponse::failure(&err)
            }
        }
    }

    /// Runs the chat exchange for an already decoded event.
    #[tracing::instrument(level = "info", skip_all)]
    pub async fn handle_event(&self, event: &InvocationEvent) -> RelayResult<ChatResponse> {
        if let Some(claims) = event.claims() {
            match claims.display_name() {
                Some(user) => info!(user, "Authenticated user"),
                None => info!("Authenticated user without email or username claim"),
            }
        }

        let request = event.chat_request()?;
        info!(message = %request.message, "Processing message");
        info!(endpoint = %self.config.fastapi_endpoint(), "Calling generation endpoint");
        info!(model = %self.config.model_id(), "Using model");

        let generation = self
            .client
            .generate(&GenerationRequest::new(request.message.as_str()))
            .await?;
        let reply = generation.text().ok_or_else(RelayError::empty_response)?;

        let history = request
            .conversation_history
            .unwrap_or_default()
            .with_exchange(&request.message, reply);

        Ok(ChatResponse::new(reply.to_string(), history))
    }
}
