use moka::future::Cache;

use super::model::SynthesisResult;

/// Process-wide memo of synthesis results, keyed by text + voice + locale.
///
/// Unbounded and without expiry: entries live for the process lifetime and
/// the cache starts cold on restart. Owned by `main` and injected into the
/// orchestrator, so a bounded or shared implementation can be swapped in
/// without touching pipeline logic.
pub struct SpeechCache {
    inner: Cache<String, SynthesisResult>,
}

impl SpeechCache {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<SynthesisResult> {
        self.inner.get(key).await
    }

    pub async fn put(&self, key: String, result: SynthesisResult) {
        self.inner.insert(key, result).await;
    }
}

impl Default for SpeechCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::speech::model::LipsyncTrack;

    fn result(audio: &str) -> SynthesisResult {
        SynthesisResult {
            audio_base64: audio.to_string(),
            lipsync: LipsyncTrack { mouth_cues: vec![] },
        }
    }

    #[tokio::test]
    async fn test_get_returns_what_was_put() {
        let cache = SpeechCache::new();
        cache.put("Hello_Matthew_en-US".to_string(), result("aGVsbG8=")).await;

        let hit = cache.get("Hello_Matthew_en-US").await.unwrap();
        assert_eq!(hit.audio_base64, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_absent_key_is_none() {
        let cache = SpeechCache::new();
        assert!(cache.get("never inserted").await.is_none());
    }
}
