use crate::error::AppError;

/// Failure of a single synthesis backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("synthesis request failed: {0}")]
    Request(String),

    #[error("could not decode synthesis output: {0}")]
    Decode(String),

    #[error(transparent)]
    Tool(#[from] ExternalToolError),

    #[error("audio artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A codec or phonetic-analysis child process went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ExternalToolError {
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with code {code}")]
    NonZeroExit { tool: String, code: i32 },
}

/// Terminal synthesis failure for one message: the primary backend failed
/// and the single fallback attempt failed too.
#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    #[error("speech synthesis failed (primary: {primary}; fallback: {fallback})")]
    Exhausted {
        primary: BackendError,
        fallback: BackendError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match err {
            SpeechServiceError::Exhausted { .. } => AppError::ExternalService(err.to_string()),
            SpeechServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
