pub mod dto;
pub mod error;
pub mod service;

pub use dto::{AvatarMessage, ChatRequest, ChatResponse, CompletionPayload};
pub use error::ChatServiceError;
pub use service::ChatService;
