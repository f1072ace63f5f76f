use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::chat::{ChatRequest, ChatResponse, ChatService},
    error::{AppError, AppResult},
    infrastructure::repositories::{ElevenLabsSpeechRepository, VoiceInfo},
};

/// Response for GET /voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<VoiceInfo>,
}

pub struct ChatController {
    chat_service: Arc<ChatService>,
    voice_catalog: Arc<ElevenLabsSpeechRepository>,
}

impl ChatController {
    pub fn new(
        chat_service: Arc<ChatService>,
        voice_catalog: Arc<ElevenLabsSpeechRepository>,
    ) -> Self {
        Self {
            chat_service,
            voice_catalog,
        }
    }

    /// POST /chat - answer a prompt with synthesized avatar messages
    pub async fn chat(
        State(controller): State<Arc<ChatController>>,
        Json(request): Json<ChatRequest>,
    ) -> AppResult<Json<ChatResponse>> {
        // Validate input; an empty message is legal and handled downstream.
        let char_count = request.message.as_deref().map_or(0, |m| m.len());
        if char_count > 10000 {
            return Err(AppError::BadRequest(
                "Message must be 10,000 characters or less".to_string(),
            ));
        }

        let messages = controller
            .chat_service
            .chat(request.message)
            .await
            .map_err(AppError::from)?;

        Ok(Json(ChatResponse { messages }))
    }

    /// GET /voices - list the fallback provider's voices
    pub async fn voices(
        State(controller): State<Arc<ChatController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        let voices = controller
            .voice_catalog
            .list_voices()
            .await
            .map_err(AppError::ExternalService)?;

        Ok(Json(VoicesResponse { voices }))
    }
}
