use std::sync::Arc;

use super::cache::SpeechCache;
use super::error::SpeechServiceError;
use super::model::{SynthesisRequest, SynthesisResult};
use crate::infrastructure::repositories::{FallbackSpeechRepository, SpeechRepository};

/// Per-message synthesis orchestrator.
///
/// Policy: cache lookup, then the primary backend; on primary failure a
/// single fallback attempt; both failing is terminal for the message. Only
/// primary results enter the cache - the fallback path is degraded quality
/// and must not poison future lookups for the same text.
pub struct SpeechService {
    primary: Arc<dyn SpeechRepository>,
    fallback: Arc<dyn FallbackSpeechRepository>,
    cache: Arc<SpeechCache>,
}

impl SpeechService {
    pub fn new(
        primary: Arc<dyn SpeechRepository>,
        fallback: Arc<dyn FallbackSpeechRepository>,
        cache: Arc<SpeechCache>,
    ) -> Self {
        Self {
            primary,
            fallback,
            cache,
        }
    }

    /// Synthesize audio and a lipsync track for one message.
    ///
    /// `slot` is the message's position in its batch and parameterizes the
    /// fallback backend's local artifact filenames.
    pub async fn synthesize(
        &self,
        request: SynthesisRequest,
        slot: usize,
    ) -> Result<SynthesisResult, SpeechServiceError> {
        let key = request.cache_key();

        if let Some(cached) = self.cache.get(&key).await {
            tracing::info!(
                slot,
                audio_size = cached.audio_base64.len(),
                cue_count = cached.lipsync.mouth_cues.len(),
                "Speech cache hit - returning cached synthesis"
            );
            return Ok(cached);
        }

        match self.primary.synthesize(&request).await {
            Ok(result) => {
                self.cache.put(key, result.clone()).await;
                tracing::info!(
                    slot,
                    audio_size = result.audio_base64.len(),
                    "Primary synthesis succeeded and was cached"
                );
                Ok(result)
            }
            Err(primary_err) => {
                tracing::warn!(
                    slot,
                    error = %primary_err,
                    "Primary synthesis failed, attempting fallback"
                );

                match self.fallback.synthesize(&request, slot).await {
                    // Degraded-quality result: returned but never cached.
                    Ok(result) => Ok(result),
                    Err(fallback_err) => {
                        tracing::error!(
                            slot,
                            error = %fallback_err,
                            "Fallback synthesis failed, message is unrecoverable"
                        );
                        Err(SpeechServiceError::Exhausted {
                            primary: primary_err,
                            fallback: fallback_err,
                        })
                    }
                }
            }
        }
    }
}
