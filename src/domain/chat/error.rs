use crate::domain::speech::SpeechServiceError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ChatServiceError {
    #[error("completion service error: {0}")]
    Completion(String),

    #[error("unexpected completion payload: {0}")]
    UpstreamFormat(String),

    #[error("canned asset error: {0}")]
    Assets(String),

    #[error(transparent)]
    Speech(#[from] SpeechServiceError),
}

impl From<ChatServiceError> for AppError {
    fn from(err: ChatServiceError) -> Self {
        match err {
            ChatServiceError::Completion(msg) => AppError::ExternalService(msg),
            ChatServiceError::UpstreamFormat(msg) => AppError::UpstreamFormat(msg),
            ChatServiceError::Assets(msg) => AppError::Internal(msg),
            ChatServiceError::Speech(e) => e.into(),
        }
    }
}
