use serde::{Deserialize, Serialize};

pub const MAX_NEW_TOKENS: u32 = 512;
pub const DO_SAMPLE: bool = true;
pub const TEMPERATURE: f64 = 0.7;
pub const TOP_P: f64 = 0.9;

/// Payload sent to `{endpoint}/generate`. Sampling parameters are fixed and never taken from the
/// caller.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub do_sample: bool,
    pub temperature: f64,
    pub top_p: f64,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: MAX_NEW_TOKENS,
            do_sample: DO_SAMPLE,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct GenerationResponse {
    #[serde(default)]
    pub generated_text: Option<String>,
    #[serde(default)]
    pub response_time: Option<f64>,
}

impl GenerationResponse {
    /// The generated text, if the endpoint produced any.
    pub fn text(&self) -> Option<&str> {
        self.generated_text.as_deref().filter(|t| !t.is_empty())
    }
}
