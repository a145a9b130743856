//! campaign-forge: marketing content generation with a hosted LLM.
//!
//! A [`session::AgentSession`] composes prompts from four form fields
//! (product, audience, objective, task type), sends them to an
//! [`llm::LlmProvider`], and keeps the latest Markdown result so it can be
//! refined in place or rated.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod feedback;
pub mod llm;
pub mod prompts;
pub mod session;

// Re-export commonly used types
pub use content::{GenerationRequest, GenerationResult, TaskType};
pub use error::{
    ComposeError, ConfigError, FeedbackError, LlmError, OracleError, SessionError, StateError,
    ValidationError,
};
pub use feedback::{FeedbackLog, FeedbackRecord};
pub use session::{AgentSession, SessionId, SessionOptions, SessionState, Turn, TurnRole};
