use serde::{Deserialize, Serialize};

use super::viseme::MouthShape;

/// Parameters for one synthesis call. Built once per message and not
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub locale_code: String,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        voice_id: impl Into<String>,
        locale_code: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            locale_code: locale_code.into(),
        }
    }

    /// Cache key for this request. Voice and locale are fixed per
    /// deployment, so plain concatenation cannot collide across distinct
    /// texts.
    pub fn cache_key(&self) -> String {
        format!("{}_{}_{}", self.text, self.voice_id, self.locale_code)
    }
}

/// One interval during which the avatar holds a single mouth shape.
/// Serialized as `{start, end, value}` - the field names the downstream
/// renderer expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouthCue {
    pub start: f64,
    pub end: f64,
    #[serde(rename = "value")]
    pub shape: MouthShape,
}

/// Canonical lipsync format. Both synthesis backends converge to this
/// shape; gaps between cues implicitly render as the closed mouth.
///
/// Deserialization drops unknown fields, so Rhubarb's `metadata` block
/// parses cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LipsyncTrack {
    #[serde(rename = "mouthCues")]
    pub mouth_cues: Vec<MouthCue>,
}

/// Finished synthesis output for one message: transport-ready audio plus
/// its time-aligned mouth-shape track. Treated as immutable once returned;
/// cache hits hand out clones.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    pub audio_base64: String,
    pub lipsync: LipsyncTrack,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_concatenates_text_voice_and_locale() {
        let request = SynthesisRequest::new("Hello there", "Matthew", "en-US");
        assert_eq!(request.cache_key(), "Hello there_Matthew_en-US");
    }

    #[test]
    fn test_mouth_cue_serializes_with_renderer_field_names() {
        let cue = MouthCue {
            start: 0.0,
            end: 0.1,
            shape: MouthShape::A,
        };
        let json = serde_json::to_value(&cue).unwrap();
        assert_eq!(json["start"], 0.0);
        assert_eq!(json["end"], 0.1);
        assert_eq!(json["value"], "A");
    }

    #[test]
    fn test_lipsync_track_parses_rhubarb_output_with_metadata() {
        let raw = r#"{
            "metadata": { "soundFile": "message_0.wav", "duration": 1.5 },
            "mouthCues": [
                { "start": 0.0, "end": 0.35, "value": "X" },
                { "start": 0.35, "end": 0.8, "value": "B" }
            ]
        }"#;
        let track: LipsyncTrack = serde_json::from_str(raw).unwrap();
        assert_eq!(track.mouth_cues.len(), 2);
        assert_eq!(track.mouth_cues[1].shape, MouthShape::B);
    }
}
