//! LLM integration for campaign-forge.
//!
//! The [`LlmProvider`] trait is the oracle seam used by agent sessions.
//! [`ChatClient`] implements it for any OpenAI-compatible endpoint:
//!
//! ```ignore
//! use campaign_forge::llm::{ChatClient, CompletionRequest, LlmProvider, Message};
//!
//! let client = ChatClient::new_with_defaults(api_key)?;
//! let request = CompletionRequest::new("", vec![Message::user("Hello!")]);
//! let response = client.generate(request).await?;
//! ```

pub mod client;

pub use client::{
    ChatClient, Choice, CompletionRequest, CompletionResponse, LlmProvider, Message, Usage,
};
