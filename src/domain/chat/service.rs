use std::path::PathBuf;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::dto::{AvatarMessage, CompletionPayload};
use super::error::ChatServiceError;
use crate::domain::speech::{SpeechService, SynthesisRequest};
use crate::infrastructure::repositories::ChatRepository;

/// Fixed instruction handed to the completion service. The expression and
/// animation vocabulary must match what the avatar renderer ships with.
const SYSTEM_PROMPT: &str = "\
You are a friendly virtual avatar called Talky. You always keep answers short and positive.
You will always reply with a JSON array of messages, with a maximum of 3 messages.
Each message has a text, facialExpression and animation property, plus an optional symbol property.
The different facial expressions are: smile, shocked, confused, apologetic, sad.
The different animations are: explaining, head to the side, idle, me, happy jump, so cute, talking, magical, nodding, point to self, question, shake head, shrug, wave, sad.
The different optional symbols are: heart, stars, lightbulb, smile, exclamation mark.";

/// Message pipeline: one completion call, then strictly in-order synthesis
/// of audio + lipsync for each returned message.
pub struct ChatService {
    chat_repo: Arc<dyn ChatRepository>,
    speech: Arc<SpeechService>,
    voice_id: String,
    locale_code: String,
    audio_dir: PathBuf,
}

impl ChatService {
    pub fn new(
        chat_repo: Arc<dyn ChatRepository>,
        speech: Arc<SpeechService>,
        voice_id: String,
        locale_code: String,
        audio_dir: PathBuf,
    ) -> Self {
        Self {
            chat_repo,
            speech,
            voice_id,
            locale_code,
            audio_dir,
        }
    }

    /// Answer one user prompt with a fully synthesized message batch.
    ///
    /// An empty or absent prompt short-circuits to the canned introduction
    /// before any completion or synthesis call. Any message whose fallback
    /// synthesis also fails aborts the whole batch.
    pub async fn chat(
        &self,
        user_message: Option<String>,
    ) -> Result<Vec<AvatarMessage>, ChatServiceError> {
        let user_message = user_message.unwrap_or_default();
        if user_message.trim().is_empty() {
            tracing::info!("Empty prompt - returning canned introduction");
            return Ok(vec![self.intro_message().await?]);
        }

        tracing::info!(prompt_length = user_message.len(), "Chat request");

        let content = self
            .chat_repo
            .complete(SYSTEM_PROMPT, &user_message)
            .await
            .map_err(ChatServiceError::Completion)?;

        let mut messages = parse_completion(&content)?;
        tracing::info!(message_count = messages.len(), "Completion parsed");

        // Sequential on purpose: fallback artifact filenames are derived
        // from the slot index and reused across requests.
        for (slot, message) in messages.iter_mut().enumerate() {
            let request =
                SynthesisRequest::new(&message.text, &self.voice_id, &self.locale_code);
            let clip = self.speech.synthesize(request, slot).await?;
            message.audio = Some(clip.audio_base64);
            message.lipsync = Some(clip.lipsync);
        }

        Ok(messages)
    }

    /// The fixed greeting served for empty prompts, assembled from
    /// pre-rendered assets on disk.
    async fn intro_message(&self) -> Result<AvatarMessage, ChatServiceError> {
        let audio_path = self.audio_dir.join("intro_0.wav");
        let lipsync_path = self.audio_dir.join("intro_0.json");

        let audio = tokio::fs::read(&audio_path)
            .await
            .map_err(|e| ChatServiceError::Assets(format!("{}: {e}", audio_path.display())))?;
        let lipsync_raw = tokio::fs::read_to_string(&lipsync_path)
            .await
            .map_err(|e| ChatServiceError::Assets(format!("{}: {e}", lipsync_path.display())))?;
        let lipsync = serde_json::from_str(&lipsync_raw)
            .map_err(|e| ChatServiceError::Assets(format!("{}: {e}", lipsync_path.display())))?;

        Ok(AvatarMessage {
            text: "Hey there... How was your day?".to_string(),
            facial_expression: "smile".to_string(),
            animation: "idle".to_string(),
            symbol: None,
            audio: Some(STANDARD.encode(audio)),
            lipsync: Some(lipsync),
        })
    }
}

fn parse_completion(content: &str) -> Result<Vec<AvatarMessage>, ChatServiceError> {
    let payload: CompletionPayload = serde_json::from_str(content)
        .map_err(|e| ChatServiceError::UpstreamFormat(e.to_string()))?;
    Ok(payload.into_messages())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion_accepts_both_envelopes() {
        let bare = r#"[{"text": "Hi", "facialExpression": "smile", "animation": "wave"}]"#;
        let wrapped =
            r#"{"messages": [{"text": "Hi", "facialExpression": "smile", "animation": "wave"}]}"#;

        assert_eq!(parse_completion(bare).unwrap().len(), 1);
        assert_eq!(parse_completion(wrapped).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_completion_rejects_prose() {
        let err = parse_completion("Sorry, I can only chat about the weather.").unwrap_err();
        assert!(matches!(err, ChatServiceError::UpstreamFormat(_)));
    }
}
