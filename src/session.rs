//! Agent session: one linear conversation with the oracle.
//!
//! A session owns its turn history and the current result. It is an ordinary
//! value owned by whoever drives the interaction (one per user), and every
//! mutating operation takes `&mut self`, so at most one oracle call per
//! session is ever in flight.
//!
//! No operation mutates the session until its oracle call has succeeded:
//! a failed generate or refine leaves history and current result untouched.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::content::{GenerationRequest, GenerationResult};
use crate::error::{OracleError, SessionError, StateError};
use crate::feedback::FeedbackRecord;
use crate::llm::{CompletionRequest, LlmProvider, Message};
use crate::prompts::{compose_initial, compose_refinement};

/// Opaque handle identifying a session in logs and feedback records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Agent,
}

/// One message in the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Agent,
            text: text.into(),
        }
    }

    fn to_message(&self) -> Message {
        match self.role {
            TurnRole::User => Message::user(self.text.clone()),
            TurnRole::Agent => Message::assistant(self.text.clone()),
        }
    }
}

/// Whether the session holds a result that can be refined or rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    HasResult,
}

/// Sampling settings applied to every oracle call of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Model identifier sent with each request.
    pub model: String,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SessionOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        }
    }
}

/// A single user's conversation with the oracle.
pub struct AgentSession {
    id: SessionId,
    provider: Arc<dyn LlmProvider>,
    options: SessionOptions,
    turns: Vec<Turn>,
    current: Option<GenerationResult>,
}

impl AgentSession {
    /// Allocate a fresh, empty session.
    pub fn start(provider: Arc<dyn LlmProvider>, options: SessionOptions) -> Self {
        let id = SessionId::new();
        tracing::debug!(session_id = %id, model = %options.model, "Session started");
        Self {
            id,
            provider,
            options,
            turns: Vec::new(),
            current: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::HasResult
        } else {
            SessionState::Empty
        }
    }

    /// The result currently on display, if any.
    pub fn current(&self) -> Option<&GenerationResult> {
        self.current.as_ref()
    }

    /// Full turn history, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Send `message` as a user turn and return the oracle's reply verbatim.
    ///
    /// The oracle sees the whole history plus the new message. Both turns
    /// are appended only after a non-empty reply arrives.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Oracle` if the call fails or the reply is
    /// empty. Failures are not retried.
    pub async fn send(&mut self, message: &str) -> Result<String, SessionError> {
        let user_turn = Turn::user(message);
        let text = self.exchange(&self.turns, &user_turn).await?;

        self.turns.push(user_turn);
        self.turns.push(Turn::agent(text.clone()));
        Ok(text)
    }

    /// One oracle call over `history` followed by `user_turn`.
    async fn exchange(&self, history: &[Turn], user_turn: &Turn) -> Result<String, SessionError> {
        let messages: Vec<Message> = history
            .iter()
            .chain(std::iter::once(user_turn))
            .map(Turn::to_message)
            .collect();

        let mut request = CompletionRequest::new(self.options.model.clone(), messages);
        if let Some(temperature) = self.options.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.options.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        tracing::debug!(
            session_id = %self.id,
            turns = history.len() + 1,
            prompt_chars = user_turn.text.len(),
            "Calling oracle"
        );

        let response = match self.provider.generate(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    session_id = %self.id,
                    error = %err,
                    transient = err.is_transient(),
                    "Oracle call failed"
                );
                return Err(OracleError::Llm(err).into());
            }
        };

        let text = response.first_content().unwrap_or_default();
        if text.trim().is_empty() {
            tracing::warn!(session_id = %self.id, "Oracle returned an empty response");
            return Err(OracleError::EmptyResponse.into());
        }

        tracing::debug!(
            session_id = %self.id,
            response_chars = text.len(),
            total_tokens = response.usage.total_tokens,
            "Oracle responded"
        );
        Ok(text.to_string())
    }

    /// Generate a fresh result from the four form fields.
    ///
    /// Invalid input is rejected before any oracle call. A generation opens
    /// a new conversation: the oracle sees only the composed payload, and on
    /// success the history restarts from this exchange and the new result
    /// replaces whatever was current.
    pub async fn generate(
        &mut self,
        request: GenerationRequest,
    ) -> Result<&GenerationResult, SessionError> {
        let payload = compose_initial(&request)?;
        let user_turn = Turn::user(payload);
        let content = self.exchange(&[], &user_turn).await?;

        self.turns = vec![user_turn, Turn::agent(content.clone())];

        tracing::info!(
            session_id = %self.id,
            task = %request.task_type,
            "Generated marketing content"
        );

        let model = self.options.model.clone();
        Ok(&*self
            .current
            .insert(GenerationResult::new(content, request, model)))
    }

    /// Revise the current result according to `instruction`.
    ///
    /// The revised result replaces the current one wholesale and keeps its
    /// source request.
    ///
    /// # Errors
    ///
    /// `SessionError::State` when nothing has been generated yet, and
    /// `SessionError::Validation` for a blank instruction. Neither issues an
    /// oracle call.
    pub async fn refine(&mut self, instruction: &str) -> Result<&GenerationResult, SessionError> {
        let payload = compose_refinement(self.current.as_ref(), instruction)?;
        let source_request = match self.current.as_ref() {
            Some(prior) => prior.source_request.clone(),
            None => return Err(StateError::NoResult.into()),
        };

        let content = self.send(&payload).await?;

        tracing::info!(
            session_id = %self.id,
            instruction_chars = instruction.trim().len(),
            "Refined marketing content"
        );

        let model = self.options.model.clone();
        Ok(&*self
            .current
            .insert(GenerationResult::new(content, source_request, model)))
    }

    /// Build a feedback record for the current result.
    ///
    /// # Errors
    ///
    /// `SessionError::State` when there is no result to rate, and
    /// `SessionError::Validation` for a rating outside 1-5.
    pub fn feedback(
        &self,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<FeedbackRecord, SessionError> {
        let current = self.current.as_ref().ok_or(StateError::NoResult)?;
        let record = FeedbackRecord::new(rating, comment)?;
        Ok(record.for_result(self.id, current.id))
    }

    /// Discard history and result, returning to `Empty`.
    pub fn reset(&mut self) {
        tracing::debug!(session_id = %self.id, turns = self.turns.len(), "Session reset");
        self.turns.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::TaskType;
    use crate::error::{LlmError, ValidationError};
    use crate::llm::{Choice, CompletionResponse, Usage};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock provider that replays scripted replies and records requests.
    struct MockLlmProvider {
        replies: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmProvider {
        fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.requests.lock().expect("lock poisoned").len()
        }

        fn last_request(&self) -> CompletionRequest {
            self.requests
                .lock()
                .expect("lock poisoned")
                .last()
                .cloned()
                .expect("at least one request")
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().expect("lock poisoned").push(request);
            let reply = self
                .replies
                .lock()
                .expect("lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::RequestFailed("no scripted reply".to_string())))?;
            Ok(CompletionResponse {
                id: "test-id".to_string(),
                model: "test-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(reply),
                    finish_reason: "stop".to_string(),
                }],
                usage: Usage {
                    prompt_tokens: 100,
                    completion_tokens: 200,
                    total_tokens: 300,
                },
            })
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "Reusable water bottle",
            "Eco-conscious students",
            "Raise brand awareness",
            TaskType::CampaignIdea,
        )
    }

    fn options() -> SessionOptions {
        SessionOptions {
            model: "test-model".to_string(),
            temperature: Some(0.5),
            max_tokens: Some(800),
        }
    }

    #[tokio::test]
    async fn test_new_session_is_empty() {
        let provider = MockLlmProvider::new(vec![]);
        let session = AgentSession::start(provider.clone(), options());

        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.turns().is_empty());
        assert!(session.current().is_none());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_sessions_have_distinct_ids() {
        let provider = MockLlmProvider::new(vec![]);
        let a = AgentSession::start(provider.clone(), options());
        let b = AgentSession::start(provider, options());
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_send_appends_turns_and_forwards_history() {
        let provider = MockLlmProvider::new(vec![Ok("first".to_string()), Ok("second".to_string())]);
        let mut session = AgentSession::start(provider.clone(), options());

        assert_eq!(session.send("hello").await.expect("send"), "first");
        assert_eq!(session.send("again").await.expect("send"), "second");

        assert_eq!(
            session.turns(),
            &[
                Turn::user("hello"),
                Turn::agent("first"),
                Turn::user("again"),
                Turn::agent("second"),
            ]
        );

        let last = provider.last_request();
        assert_eq!(last.model, "test-model");
        assert_eq!(last.temperature, Some(0.5));
        assert_eq!(last.max_tokens, Some(800));
        assert_eq!(
            last.messages,
            vec![
                Message::user("hello"),
                Message::assistant("first"),
                Message::user("again"),
            ]
        );
    }

    #[tokio::test]
    async fn test_send_failure_leaves_history_unchanged() {
        let provider = MockLlmProvider::new(vec![
            Ok("first".to_string()),
            Err(LlmError::RateLimited("quota".to_string())),
        ]);
        let mut session = AgentSession::start(provider, options());
        session.send("hello").await.expect("send");

        let err = session.send("again").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Oracle(OracleError::Llm(LlmError::RateLimited(_)))
        ));
        assert_eq!(session.turns().len(), 2);
    }

    #[tokio::test]
    async fn test_send_rejects_blank_response() {
        let provider = MockLlmProvider::new(vec![Ok("  \n".to_string())]);
        let mut session = AgentSession::start(provider, options());

        let err = session.send("hello").await.unwrap_err();
        assert!(matches!(err, SessionError::Oracle(OracleError::EmptyResponse)));
        assert!(session.turns().is_empty());
    }

    #[tokio::test]
    async fn test_generate_sets_current_result_verbatim() {
        let markdown = "**Campaign Name:** Refill Rebels\n\n**Headline:** Sip smarter";
        let provider = MockLlmProvider::new(vec![Ok(markdown.to_string())]);
        let mut session = AgentSession::start(provider.clone(), options());

        let result = session.generate(request()).await.expect("generate");
        assert_eq!(result.content, markdown);
        assert_eq!(result.source_request, request());
        assert_eq!(result.model, "test-model");
        assert_eq!(session.state(), SessionState::HasResult);

        let sent = provider.last_request();
        assert_eq!(sent.messages.len(), 1);
        assert!(sent.messages[0].content.contains("Product: Reusable water bottle"));
    }

    #[tokio::test]
    async fn test_second_generate_starts_a_new_conversation() {
        let provider = MockLlmProvider::new(vec![
            Ok("bottle campaign".to_string()),
            Ok("shorter bottle campaign".to_string()),
            Ok("watch campaign".to_string()),
        ]);
        let mut session = AgentSession::start(provider.clone(), options());
        session.generate(request()).await.expect("generate");
        session.refine("make it shorter").await.expect("refine");

        let watch = GenerationRequest::new(
            "Luxury watch",
            "Executives",
            "Drive pre-orders",
            TaskType::AdCopy,
        );
        let result = session.generate(watch.clone()).await.expect("generate");
        assert_eq!(result.content, "watch campaign");
        assert_eq!(result.source_request, watch);

        let sent = provider.last_request();
        assert_eq!(sent.messages.len(), 1);
        assert!(sent.messages[0].content.contains("Product: Luxury watch"));
        assert!(!sent.messages[0].content.contains("Reusable water bottle"));
        assert!(!sent.messages[0].content.contains("bottle campaign"));
        assert_eq!(session.turns().len(), 2);
        assert_eq!(session.turns()[1], Turn::agent("watch campaign"));
    }

    #[tokio::test]
    async fn test_failed_second_generate_keeps_prior_conversation() {
        let provider = MockLlmProvider::new(vec![
            Ok("bottle campaign".to_string()),
            Ok("shorter bottle campaign".to_string()),
            Err(LlmError::RateLimited("quota".to_string())),
        ]);
        let mut session = AgentSession::start(provider, options());
        session.generate(request()).await.expect("generate");
        session.refine("make it shorter").await.expect("refine");

        assert!(session.generate(request()).await.is_err());
        assert_eq!(session.turns().len(), 4);
        assert_eq!(
            session.current().map(|r| r.content.as_str()),
            Some("shorter bottle campaign")
        );
    }

    #[tokio::test]
    async fn test_generate_with_empty_field_makes_no_call() {
        let provider = MockLlmProvider::new(vec![Ok("unused".to_string())]);
        let mut session = AgentSession::start(provider.clone(), options());

        let mut r = request();
        r.audience = "  ".to_string();
        let err = session.generate(r).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::EmptyField { field: "audience" })
        ));
        assert_eq!(provider.calls(), 0);
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn test_refine_in_empty_state_makes_no_call() {
        let provider = MockLlmProvider::new(vec![Ok("unused".to_string())]);
        let mut session = AgentSession::start(provider.clone(), options());

        let err = session.refine("make it shorter").await.unwrap_err();
        assert!(matches!(err, SessionError::State(StateError::NoResult)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_refine_with_blank_instruction_makes_no_call() {
        let provider = MockLlmProvider::new(vec![Ok("original".to_string())]);
        let mut session = AgentSession::start(provider.clone(), options());
        session.generate(request()).await.expect("generate");

        let err = session.refine("   ").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::EmptyInstruction)
        ));
        assert_eq!(provider.calls(), 1);
        assert_eq!(session.current().map(|r| r.content.as_str()), Some("original"));
    }

    #[tokio::test]
    async fn test_refine_replaces_current_result() {
        let provider = MockLlmProvider::new(vec![
            Ok("original campaign".to_string()),
            Ok("shorter campaign".to_string()),
        ]);
        let mut session = AgentSession::start(provider.clone(), options());
        let original_id = session.generate(request()).await.expect("generate").id;

        let refined = session.refine("make it shorter").await.expect("refine");
        assert_eq!(refined.content, "shorter campaign");
        assert_ne!(refined.id, original_id);
        assert_eq!(refined.source_request, request());

        let sent = provider.last_request();
        let payload = &sent.messages.last().expect("user message").content;
        assert!(payload.contains("original campaign"));
        assert!(payload.contains("make it shorter"));
    }

    #[tokio::test]
    async fn test_failed_refine_keeps_prior_result() {
        let provider = MockLlmProvider::new(vec![
            Ok("original".to_string()),
            Err(LlmError::ApiError {
                code: 500,
                message: "boom".to_string(),
            }),
        ]);
        let mut session = AgentSession::start(provider, options());
        session.generate(request()).await.expect("generate");

        assert!(session.refine("funnier").await.is_err());
        assert_eq!(session.current().map(|r| r.content.as_str()), Some("original"));
        assert_eq!(session.turns().len(), 2);
    }

    #[tokio::test]
    async fn test_feedback_requires_result_and_valid_rating() {
        let provider = MockLlmProvider::new(vec![Ok("original".to_string())]);
        let mut session = AgentSession::start(provider, options());

        assert!(matches!(
            session.feedback(5, None),
            Err(SessionError::State(StateError::NoResult))
        ));

        let result_id = session.generate(request()).await.expect("generate").id;

        assert!(matches!(
            session.feedback(7, None),
            Err(SessionError::Validation(ValidationError::RatingOutOfRange(7)))
        ));

        let record = session.feedback(4, Some("nice")).expect("feedback");
        assert_eq!(record.rating, 4);
        assert_eq!(record.session_id, Some(session.id()));
        assert_eq!(record.result_id, Some(result_id));
    }

    #[tokio::test]
    async fn test_reset_returns_to_empty() {
        let provider = MockLlmProvider::new(vec![Ok("original".to_string())]);
        let mut session = AgentSession::start(provider, options());
        session.generate(request()).await.expect("generate");

        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.turns().is_empty());
        assert!(matches!(
            session.refine("shorter").await,
            Err(SessionError::State(StateError::NoResult))
        ));
    }
}
