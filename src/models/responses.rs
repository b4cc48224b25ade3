use serde::{Deserialize, Serialize};

use crate::models::domain::EventRecommendation;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Conversation starter suggestions for a profile pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationStartersResponse {
    pub suggestions: Vec<String>,
}

/// Ranked event recommendations for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecommendationsResponse {
    pub recommendations: Vec<EventRecommendation>,
}
