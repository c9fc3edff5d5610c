use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message exchanged between the user and the assistant.
///
/// Turns supplied by the caller are carried through untouched: the role is kept as written and
/// any extra keys are preserved in `extra`.
#[derive(Deserialize, Serialize, PartialEq, Clone, Debug)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role: role.as_str().to_string(),
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role.as_str()
    }
}

/// Caller owned chat history in chronological order. Turns are only ever appended.
#[derive(Deserialize, Serialize, PartialEq, Clone, Debug, Default)]
#[serde(transparent)]
pub struct ConversationHistory(Vec<ConversationTurn>);

impl ConversationHistory {
    /// Returns a copy of this history extended with the user message and the assistant reply.
    pub fn with_exchange(&self, message: &str, reply: &str) -> Self {
        let mut turns = Vec::with_capacity(self.0.len() + 2);
        turns.extend_from_slice(&self.0);
        turns.push(ConversationTurn::user(message));
        turns.push(ConversationTurn::assistant(reply));
        Self(turns)
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ConversationTurn>> for ConversationHistory {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self(turns)
    }
}
