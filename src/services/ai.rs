use chrono::Utc;
use thiserror::Error;

use crate::core::{
    parse_chat_response, parse_compatibility, parse_event_recommendations, parse_moderation,
    parse_suggestions, prompts, ParseError,
};
use crate::models::{
    ChatResponse, CompatibilityScore, Event, EventRecommendation, ModerationKind,
    ModerationResult, Profile,
};
use crate::services::anthropic::{AnthropicClient, GatewayError};

// Per-call token budgets
const COMPATIBILITY_MAX_TOKENS: u32 = 1000;
const ASSISTANT_MAX_TOKENS: u32 = 1500;
const MODERATION_MAX_TOKENS: u32 = 500;
const STARTERS_MAX_TOKENS: u32 = 600;
const RECOMMENDATIONS_MAX_TOKENS: u32 = 1000;

/// Errors from the model pipeline (gateway call or response coercion)
#[derive(Debug, Error)]
pub enum AiError {
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Per-use-case wrappers around the model gateway
///
/// The `try_*` methods expose the real outcome as a `Result`, so a caller
/// can tell a genuine model answer from a failure. The plain methods are the
/// fail-soft surface used by the HTTP layer: any error is logged and
/// replaced by the documented static fallback, and nothing propagates.
pub struct AiService {
    gateway: AnthropicClient,
}

impl AiService {
    pub fn new(gateway: AnthropicClient) -> Self {
        Self { gateway }
    }

    /// Compatibility reading between two profiles
    pub async fn try_compatibility(
        &self,
        person: &Profile,
        target: &Profile,
    ) -> Result<CompatibilityScore, AiError> {
        let prompt = prompts::compatibility_prompt(person, target, Utc::now().date_naive());
        let text = self.gateway.complete(&prompt, COMPATIBILITY_MAX_TOKENS).await?;
        Ok(parse_compatibility(&text)?)
    }

    pub async fn compatibility(&self, person: &Profile, target: &Profile) -> CompatibilityScore {
        match self.try_compatibility(person, target).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Compatibility analysis failed, using fallback: {}", e);
                CompatibilityScore::fallback()
            }
        }
    }

    /// Educational Q&A, with the caller's profile as optional context
    pub async fn try_assistant(
        &self,
        question: &str,
        profile: Option<&Profile>,
    ) -> Result<ChatResponse, AiError> {
        let prompt = prompts::assistant_prompt(question, profile);
        let text = self.gateway.complete(&prompt, ASSISTANT_MAX_TOKENS).await?;
        Ok(parse_chat_response(&text)?)
    }

    pub async fn assistant(&self, question: &str, profile: Option<&Profile>) -> ChatResponse {
        match self.try_assistant(question, profile).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Assistant reply failed, using fallback: {}", e);
                ChatResponse::fallback()
            }
        }
    }

    /// Content screening
    pub async fn try_moderate(
        &self,
        content: &str,
        kind: ModerationKind,
    ) -> Result<ModerationResult, AiError> {
        let prompt = prompts::moderation_prompt(content, kind);
        let text = self.gateway.complete(&prompt, MODERATION_MAX_TOKENS).await?;
        Ok(parse_moderation(&text)?)
    }

    pub async fn moderate(&self, content: &str, kind: ModerationKind) -> ModerationResult {
        match self.try_moderate(content, kind).await {
            Ok(result) => result,
            Err(e) => {
                // Fail open: screening is advisory and must not block users
                // on infrastructure failure
                tracing::warn!("Moderation failed, using fallback: {}", e);
                ModerationResult::fallback()
            }
        }
    }

    /// Conversation starter suggestions
    pub async fn try_conversation_starters(
        &self,
        person: &Profile,
        target: &Profile,
    ) -> Result<Vec<String>, AiError> {
        let prompt =
            prompts::conversation_starters_prompt(person, target, Utc::now().date_naive());
        let text = self.gateway.complete(&prompt, STARTERS_MAX_TOKENS).await?;
        Ok(parse_suggestions(&text)?)
    }

    pub async fn conversation_starters(&self, person: &Profile, target: &Profile) -> Vec<String> {
        match self.try_conversation_starters(person, target).await {
            Ok(suggestions) if !suggestions.is_empty() => suggestions,
            Ok(_) => {
                tracing::warn!("Model returned no conversation starters, using fallback");
                fallback_conversation_starters()
            }
            Err(e) => {
                tracing::warn!("Conversation starters failed, using fallback: {}", e);
                fallback_conversation_starters()
            }
        }
    }

    /// Ranked event recommendations
    pub async fn try_event_recommendations(
        &self,
        profile: &Profile,
        events: &[Event],
    ) -> Result<Vec<EventRecommendation>, AiError> {
        let prompt =
            prompts::event_recommendations_prompt(profile, events, Utc::now().date_naive());
        let text = self
            .gateway
            .complete(&prompt, RECOMMENDATIONS_MAX_TOKENS)
            .await?;
        Ok(parse_event_recommendations(&text)?)
    }

    pub async fn event_recommendations(
        &self,
        profile: &Profile,
        events: &[Event],
    ) -> Vec<EventRecommendation> {
        match self.try_event_recommendations(profile, events).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                tracing::warn!("Event recommendations failed, using fallback: {}", e);
                vec![]
            }
        }
    }
}

/// Canned bilingual starters for when the model is unreachable
pub fn fallback_conversation_starters() -> Vec<String> {
    vec![
        "Qu'est-ce qui t'a amené·e sur Fluide ? / What brought you to Fluide?".to_string(),
        "Quelle pratique aimerais-tu explorer en ce moment ? / What practice are you curious \
         about right now?"
            .to_string(),
        "Qu'est-ce qu'une belle rencontre pour toi ? / What does a great connection look like \
         to you?"
            .to_string(),
    ]
}
