//! Fluide API - backend service for the Fluide community platform
//!
//! This library provides the HTTP surface of the Fluide app: profile
//! storage and search, plus the AI-assisted flows (compatibility readings,
//! educational Q&A, content screening and recommendations) delegated to a
//! hosted chat-completion model.

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use models::{
    ChatResponse, CompatibilityScore, EventRecommendation, ModerationResult, Profile,
};
pub use services::{AiService, AnthropicClient, PostgresClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let fallback = CompatibilityScore::fallback();
        assert_eq!(fallback.score, 50);
    }
}
