use serde::{Deserialize, Serialize};

use crate::domain::speech::LipsyncTrack;

/// Request for POST /chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response for POST /chat
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub messages: Vec<AvatarMessage>,
}

/// One avatar message: the model supplies text, expression, animation and
/// an optional symbol; the pipeline attaches audio and lipsync afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarMessage {
    pub text: String,
    #[serde(default)]
    pub facial_expression: String,
    #[serde(default)]
    pub animation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lipsync: Option<LipsyncTrack>,
}

/// The completion service is not reliable about its envelope: sometimes it
/// returns a bare array, sometimes an object wrapping a `messages` array.
/// Both are accepted here and normalized to one shape immediately; the
/// ambiguity never travels further inward.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CompletionPayload {
    Wrapped { messages: Vec<AvatarMessage> },
    Bare(Vec<AvatarMessage>),
}

impl CompletionPayload {
    pub fn into_messages(self) -> Vec<AvatarMessage> {
        match self {
            CompletionPayload::Wrapped { messages } => messages,
            CompletionPayload::Bare(messages) => messages,
        }
    }
}
