use async_trait::async_trait;

use crate::domain::speech::{BackendError, SynthesisRequest, SynthesisResult};

/// Repository for the primary synthesis path.
///
/// Implementations are responsible for:
/// - Producing the audio payload and the raw phoneme timing for one text
/// - Normalizing provider-native timing into the canonical lipsync track
/// - Provider-specific voice/locale/engine selection
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Synthesize audio and a lipsync track for one message text.
    ///
    /// # Errors
    /// Returns `BackendError` if either synthesis call or its decode step
    /// fails. No partial results.
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, BackendError>;
}

/// Repository for the fallback synthesis path.
///
/// The fallback works through local files and external tools; `slot` is the
/// message's position in its batch and names the intermediate artifacts, so
/// sequential processing may reuse the same files across requests.
#[async_trait]
pub trait FallbackSpeechRepository: Send + Sync {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        slot: usize,
    ) -> Result<SynthesisResult, BackendError>;
}
