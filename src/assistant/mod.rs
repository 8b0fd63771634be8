//! Chat session core: transcript, connectivity state, remote inference and
//! the offline fallback responder.
//!
//! Nothing in this module writes to the terminal. Presentation layers render
//! from [`ChatSession::transcript`] and the [`SessionEvent`] subscription.

mod client;
mod error;
mod fallback;
mod language;
mod message;
mod probe;
mod prompt;
mod session;
mod transcript;

pub use client::{
    ApiFlavor, CompletionRequest, EndpointConfig, GenerationOptions, HttpBackend, InferenceBackend,
};
pub use error::{BackendError, ConfigError, StoreError};
pub use fallback::{fallback_response, quick_questions, welcome_message};
pub use language::{Language, SUPPORTED_LANGUAGES};
pub use message::{ChatMessage, Role};
pub use probe::{DEFAULT_PROBE_INTERVAL, ProbeTask};
pub use prompt::system_prompt;
pub use session::{
    ChatSession, ConnectionState, DEFAULT_CONTEXT_MESSAGES, DEFAULT_HISTORY_LIMIT, DEFAULT_TIMEOUT,
    SessionConfig, SessionEvent, SessionStatus, Submission,
};
pub use transcript::{DEFAULT_MAX_TRANSCRIPT, Transcript};
