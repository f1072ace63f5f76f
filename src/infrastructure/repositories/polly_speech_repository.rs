use super::speech_repository::SpeechRepository;
use crate::domain::speech::{
    track_from_marks, BackendError, SynthesisRequest, SynthesisResult, VisemeMark,
};
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, LanguageCode, OutputFormat, SpeechMarkType, VoiceId},
    Client as PollyClient,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;

/// AWS Polly implementation of the primary synthesis path.
///
/// One message costs two synthesize calls run concurrently: MP3 audio and
/// newline-delimited JSON viseme marks, identical voice/locale/engine. If
/// either call fails the whole synthesis fails - no partial result.
pub struct PollySpeechRepository {
    polly_client: Arc<PollyClient>,
}

impl PollySpeechRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Request the audio rendition of the text.
    async fn request_audio(&self, request: &SynthesisRequest) -> Result<Vec<u8>, BackendError> {
        let result = self
            .polly_client
            .synthesize_speech()
            .text(&request.text)
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .language_code(LanguageCode::from(request.locale_code.as_str()))
            .engine(Engine::Neural)
            .output_format(OutputFormat::Mp3)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    voice = %request.voice_id,
                    text_length = request.text.len(),
                    "AWS Polly audio synthesis failed"
                );
                BackendError::Request(format!("AWS Polly audio error: {e}"))
            })?;

        let audio_stream = result
            .audio_stream
            .collect()
            .await
            .map_err(|e| BackendError::Decode(format!("failed to read audio stream: {e}")))?;

        Ok(audio_stream.into_bytes().to_vec())
    }

    /// Request the viseme speech marks for the same text.
    async fn request_marks(&self, request: &SynthesisRequest) -> Result<Vec<u8>, BackendError> {
        let result = self
            .polly_client
            .synthesize_speech()
            .text(&request.text)
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .language_code(LanguageCode::from(request.locale_code.as_str()))
            .engine(Engine::Neural)
            .output_format(OutputFormat::Json)
            .speech_mark_types(SpeechMarkType::Viseme)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    voice = %request.voice_id,
                    text_length = request.text.len(),
                    "AWS Polly speech-mark synthesis failed"
                );
                BackendError::Request(format!("AWS Polly speech-mark error: {e}"))
            })?;

        let mark_stream = result
            .audio_stream
            .collect()
            .await
            .map_err(|e| BackendError::Decode(format!("failed to read mark stream: {e}")))?;

        Ok(mark_stream.into_bytes().to_vec())
    }
}

/// Parse Polly's newline-delimited speech-mark records. Each line is an
/// independent JSON document; blank lines are skipped.
fn parse_viseme_marks(raw: &[u8]) -> Result<Vec<VisemeMark>, BackendError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| BackendError::Decode(format!("speech marks are not UTF-8: {e}")))?;

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line)
                .map_err(|e| BackendError::Decode(format!("bad speech mark record: {e}")))
        })
        .collect()
}

#[async_trait]
impl SpeechRepository for PollySpeechRepository {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<SynthesisResult, BackendError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            voice = %request.voice_id,
            locale = %request.locale_code,
            text_length = request.text.len(),
            text_preview = &request.text[..request.text.len().min(200)],
            "Calling AWS Polly for audio and viseme marks"
        );

        // Fork-join: both calls must succeed, first failure wins.
        let (audio_bytes, mark_bytes) =
            tokio::try_join!(self.request_audio(request), self.request_marks(request))?;

        let marks = parse_viseme_marks(&mark_bytes)?;
        let lipsync = track_from_marks(&marks);
        let audio_base64 = STANDARD.encode(&audio_bytes);

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio_bytes.len(),
            mark_count = marks.len(),
            "Primary synthesis completed"
        );

        Ok(SynthesisResult {
            audio_base64,
            lipsync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::speech::MouthShape;

    #[test]
    fn test_parse_viseme_marks_splits_lines() {
        let raw = concat!(
            r#"{"time":0,"type":"viseme","value":"p"}"#,
            "\n",
            r#"{"time":125,"type":"viseme","value":"a"}"#,
            "\n",
            r#"{"time":250,"type":"viseme","value":"sil","duration":80}"#,
            "\n",
        );

        let marks = parse_viseme_marks(raw.as_bytes()).unwrap();
        assert_eq!(marks.len(), 3);
        assert_eq!(marks[0].value, "p");
        assert_eq!(marks[1].time, 125);
        assert_eq!(marks[2].duration, Some(80));
    }

    #[test]
    fn test_parse_viseme_marks_skips_blank_lines() {
        let raw = "\n{\"time\":0,\"type\":\"viseme\",\"value\":\"t\"}\n\n";
        let marks = parse_viseme_marks(raw.as_bytes()).unwrap();
        assert_eq!(marks.len(), 1);
    }

    #[test]
    fn test_parse_viseme_marks_rejects_garbage() {
        let err = parse_viseme_marks(b"not json at all").unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[test]
    fn test_marks_flow_into_canonical_track() {
        let raw = concat!(
            r#"{"time":0,"type":"viseme","value":"p"}"#,
            "\n",
            r#"{"time":100,"type":"viseme","value":"a","duration":150}"#,
        );
        let marks = parse_viseme_marks(raw.as_bytes()).unwrap();
        let track = track_from_marks(&marks);

        assert_eq!(track.mouth_cues[0].shape, MouthShape::A);
        assert_eq!(track.mouth_cues[0].end, 0.1);
        assert_eq!(track.mouth_cues[1].shape, MouthShape::D);
        assert_eq!(track.mouth_cues[1].end, 0.25);
    }
}
