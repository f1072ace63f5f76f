pub mod cache;
pub mod error;
pub mod model;
pub mod service;
pub mod viseme;

pub use cache::SpeechCache;
pub use error::{BackendError, ExternalToolError, SpeechServiceError};
pub use model::{LipsyncTrack, MouthCue, SynthesisRequest, SynthesisResult};
pub use service::SpeechService;
pub use viseme::{track_from_marks, MouthShape, VisemeMark};
