//! Error types for campaign-forge operations.
//!
//! Defines the error taxonomy for every stage of a user action:
//! - Input validation before any prompt is composed
//! - Session state checks (refining or rating before a result exists)
//! - Oracle (LLM) failures
//! - Configuration loading and feedback persistence

use thiserror::Error;

/// Errors raised when user input is rejected before an oracle call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required and cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Refinement instruction cannot be empty")]
    EmptyInstruction,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("Unknown task type '{0}': expected campaign-idea, ad-copy or product-description")]
    UnknownTaskType(String),
}

/// Errors raised when an action requires a result the session does not have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("No result has been generated yet; generate one before refining or rating it")]
    NoResult,
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API base URL: CAMPAIGN_FORGE_API_BASE is empty")]
    MissingApiBase,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

impl LlmError {
    /// Whether the failure looks transient (quota, server-side, network).
    ///
    /// Sessions never retry on this basis; it only feeds log output.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RequestFailed(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout")
                    || msg.contains("timed out")
                    || msg.contains("connection")
                    || msg.contains("temporarily")
            }
            LlmError::RateLimited(_) => true,
            LlmError::ApiError { code, .. } => *code >= 500 || *code == 429,
            LlmError::MissingApiBase | LlmError::ParseError(_) => false,
        }
    }
}

/// Errors surfaced when the oracle call fails or produces nothing usable.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("Generation failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation failed: the model returned an empty response")]
    EmptyResponse,
}

/// Errors from composing a refinement prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors from agent session operations.
///
/// Every variant is scoped to the action that raised it; the session is left
/// exactly as it was before the action.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<ComposeError> for SessionError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::Validation(e) => SessionError::Validation(e),
            ComposeError::State(e) => SessionError::State(e),
        }
    }
}

impl From<LlmError> for SessionError {
    fn from(err: LlmError) -> Self {
        SessionError::Oracle(OracleError::Llm(err))
    }
}

impl SessionError {
    /// Message suitable for showing to the person who triggered the action.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(e) => format!("Please check your input: {}", e),
            SessionError::State(_) => {
                "Please generate a result first before refining or rating it.".to_string()
            }
            SessionError::Oracle(_) => "Generation failed, please try again.".to_string(),
        }
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Errors that can occur while persisting feedback.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Failed to create feedback directory: {0}")]
    DirectoryCreationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid feedback record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}
