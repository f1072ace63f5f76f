pub mod chat_repository;
pub mod elevenlabs_speech_repository;
pub mod openai_chat_repository;
pub mod polly_speech_repository;
pub mod speech_repository;

pub use chat_repository::ChatRepository;
pub use elevenlabs_speech_repository::{ElevenLabsSpeechRepository, VoiceInfo};
pub use openai_chat_repository::OpenAiChatRepository;
pub use polly_speech_repository::PollySpeechRepository;
pub use speech_repository::{FallbackSpeechRepository, SpeechRepository};
