use super::speech_repository::FallbackSpeechRepository;
use crate::domain::speech::{
    BackendError, ExternalToolError, LipsyncTrack, SynthesisRequest, SynthesisResult,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// ElevenLabs + local-tool implementation of the fallback synthesis path.
///
/// Pipeline per message: fetch MP3 from ElevenLabs, transcode to WAV with
/// ffmpeg, run Rhubarb Lip-Sync over the WAV in its fast phonetic mode, then
/// read the audio and timing artifacts back from disk. Slower and with more
/// failure points than the primary path - it only runs when Polly is down.
pub struct ElevenLabsSpeechRepository {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    audio_dir: PathBuf,
    ffmpeg_path: PathBuf,
    rhubarb_path: PathBuf,
}

#[derive(Serialize)]
struct SynthesizeBody {
    text: String,
    model_id: String,
}

#[derive(Debug, Deserialize)]
struct VoicesPayload {
    voices: Vec<VoiceInfo>,
}

/// Voice catalog entry returned by GET /voices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
}

impl ElevenLabsSpeechRepository {
    pub fn new(
        api_key: String,
        voice_id: String,
        model_id: String,
        audio_dir: PathBuf,
        ffmpeg_path: PathBuf,
        rhubarb_path: PathBuf,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
            model_id,
            audio_dir,
            ffmpeg_path,
            rhubarb_path,
        }
    }

    /// Base path (without extension) for one message slot's artifacts.
    /// Slots are reused across requests; files are overwritten in place.
    fn artifact_base(&self, slot: usize) -> PathBuf {
        self.audio_dir.join(format!("message_{slot}"))
    }

    async fn fetch_audio(&self, text: &str) -> Result<Vec<u8>, BackendError> {
        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.voice_id
        );

        let body = SynthesizeBody {
            text: text.to_string(),
            model_id: self.model_id.clone(),
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Request(format!("ElevenLabs request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(BackendError::Request(format!(
                "ElevenLabs API error {status}: {detail}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Decode(format!("failed to read audio bytes: {e}")))?;

        Ok(bytes.to_vec())
    }

    /// Run one external tool to completion, checking its exit status.
    async fn run_tool(&self, tool: &str, program: &Path, args: &[&str]) -> Result<(), ExternalToolError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExternalToolError::Launch {
                tool: tool.to_string(),
                source,
            })?;

        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!(tool, stderr = %stderr, "external tool stderr");
        }

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            return Err(ExternalToolError::NonZeroExit {
                tool: tool.to_string(),
                code,
            });
        }

        Ok(())
    }

    async fn transcode_to_wav(&self, mp3: &Path, wav: &Path) -> Result<(), ExternalToolError> {
        // -y overwrites the slot's previous artifact.
        let mp3 = mp3.to_string_lossy().into_owned();
        let wav = wav.to_string_lossy().into_owned();
        self.run_tool("ffmpeg", &self.ffmpeg_path, &["-y", "-i", &mp3, &wav])
            .await
    }

    async fn extract_mouth_cues(&self, wav: &Path, json: &Path) -> Result<(), ExternalToolError> {
        // -r phonetic is faster but less accurate; acceptable on the
        // degraded path.
        let wav = wav.to_string_lossy().into_owned();
        let json = json.to_string_lossy().into_owned();
        self.run_tool(
            "rhubarb",
            &self.rhubarb_path,
            &["-f", "json", "-o", &json, &wav, "-r", "phonetic"],
        )
        .await
    }

    /// List the provider's available voices.
    pub async fn list_voices(&self) -> Result<Vec<VoiceInfo>, String> {
        let response = self
            .client
            .get("https://api.elevenlabs.io/v1/voices")
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| format!("ElevenLabs voices request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("ElevenLabs API error {status}: {detail}"));
        }

        let payload: VoicesPayload = response
            .json()
            .await
            .map_err(|e| format!("failed to parse voices response: {e}"))?;

        Ok(payload.voices)
    }
}

#[async_trait]
impl FallbackSpeechRepository for ElevenLabsSpeechRepository {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        slot: usize,
    ) -> Result<SynthesisResult, BackendError> {
        let start_time = std::time::Instant::now();
        let base = self.artifact_base(slot);
        let mp3_path = base.with_extension("mp3");
        let wav_path = base.with_extension("wav");
        let json_path = base.with_extension("json");

        tracing::info!(
            slot,
            voice = %self.voice_id,
            text_length = request.text.len(),
            "Starting fallback synthesis"
        );

        // 1. Remote synthesis, written to the slot's mp3 artifact.
        let audio = self.fetch_audio(&request.text).await?;
        tokio::fs::create_dir_all(&self.audio_dir).await?;
        tokio::fs::write(&mp3_path, &audio).await?;

        // 2. Transcode for the analyzer.
        self.transcode_to_wav(&mp3_path, &wav_path).await?;
        tracing::debug!(
            slot,
            latency_ms = start_time.elapsed().as_millis(),
            "Transcode done"
        );

        // 3. Phonetic analysis writes the timing file in canonical format.
        self.extract_mouth_cues(&wav_path, &json_path).await?;
        tracing::debug!(
            slot,
            latency_ms = start_time.elapsed().as_millis(),
            "Lip sync done"
        );

        // 4. Read both artifacts back.
        let audio = tokio::fs::read(&mp3_path).await?;
        let transcript = tokio::fs::read_to_string(&json_path).await?;
        let lipsync: LipsyncTrack = serde_json::from_str(&transcript)
            .map_err(|e| BackendError::Decode(format!("bad lipsync transcript: {e}")))?;

        tracing::info!(
            provider = "elevenlabs+rhubarb",
            slot,
            latency_ms = start_time.elapsed().as_millis(),
            audio_size_bytes = audio.len(),
            cue_count = lipsync.mouth_cues.len(),
            "Fallback synthesis completed"
        );

        Ok(SynthesisResult {
            audio_base64: STANDARD.encode(&audio),
            lipsync,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository(audio_dir: &str) -> ElevenLabsSpeechRepository {
        ElevenLabsSpeechRepository::new(
            "el-test".to_string(),
            "voice".to_string(),
            "eleven_multilingual_v2".to_string(),
            PathBuf::from(audio_dir),
            PathBuf::from("ffmpeg"),
            PathBuf::from("./bin/rhubarb"),
        )
    }

    #[test]
    fn test_artifact_names_derive_from_slot() {
        let repo = repository("audios");
        let base = repo.artifact_base(2);
        assert_eq!(base.with_extension("mp3"), PathBuf::from("audios/message_2.mp3"));
        assert_eq!(base.with_extension("wav"), PathBuf::from("audios/message_2.wav"));
        assert_eq!(base.with_extension("json"), PathBuf::from("audios/message_2.json"));
    }

    #[test]
    fn test_voices_payload_parses() {
        let raw = r#"{"voices": [
            {"voice_id": "9BWtsMINqrJLrRacOk9x", "name": "Aria", "category": "premade"},
            {"voice_id": "G3hRJZ8nXEfgXIpKdanG", "name": "Archer"}
        ]}"#;
        let payload: VoicesPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.voices.len(), 2);
        assert_eq!(payload.voices[0].name, "Aria");
    }

    #[tokio::test]
    async fn test_missing_tool_is_a_launch_error() {
        let repo = repository("audios");
        let err = repo
            .run_tool(
                "rhubarb",
                Path::new("/nonexistent/rhubarb-binary"),
                &["-f", "json"],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExternalToolError::Launch { .. }));
    }
}
