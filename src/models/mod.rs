// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ChatResponse, CompatibilityScore, Event, EventRecommendation, ModerationKind,
    ModerationResult, Profile, ResourceLink, Severity, EXPERIENCED_PRACTICE_COUNT,
};
pub use requests::{
    AssistantRequest, CompatibilityRequest, ConversationStartersRequest, CreateProfileRequest,
    ModerateRequest, ProfileSearchQuery, UpdateProfileRequest,
};
pub use responses::{
    ConversationStartersResponse, ErrorResponse, EventRecommendationsResponse, HealthResponse,
};
