use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::models::{
    AssistantRequest, CompatibilityRequest, ConversationStartersRequest,
    ConversationStartersResponse, ErrorResponse, EventRecommendationsResponse, ModerateRequest,
    ModerationKind, Profile,
};
use crate::routes::AppState;
use crate::services::{PostgresError, MAX_EVENT_CANDIDATES};

/// Configure all AI-assisted routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ai")
            .route("/compatibility", web::post().to(compatibility))
            .route("/assistant", web::post().to(assistant))
            .route("/moderate", web::post().to(moderate))
            .route("/conversation-starters", web::post().to(conversation_starters))
            .route("/event-recommendations", web::get().to(event_recommendations)),
    );
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Load a profile, mapping absence to 404 before any model call is made
async fn load_profile(state: &AppState, user_id: &str) -> Result<Profile, HttpResponse> {
    match state.postgres.get_profile(user_id).await {
        Ok(profile) => Ok(profile),
        Err(PostgresError::NotFound(_)) => Err(HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile for user {}", user_id),
            status_code: 404,
        })),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            Err(HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            }))
        }
    }
}

/// Compatibility reading endpoint
///
/// POST /api/ai/compatibility
async fn compatibility(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CompatibilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let caller = match load_profile(&state, &user.0).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    let target = match load_profile(&state, &req.target_user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    tracing::info!("Compatibility request: {} -> {}", user.0, req.target_user_id);

    let result = state.ai.compatibility(&caller, &target).await;

    HttpResponse::Ok().json(result)
}

/// Educational Q&A endpoint
///
/// POST /api/ai/assistant
async fn assistant(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<AssistantRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    // The caller's profile is optional context; a store failure degrades to
    // an uncontextualized answer rather than failing the request
    let profile = match state.postgres.get_profile(&user.0).await {
        Ok(profile) => Some(profile),
        Err(PostgresError::NotFound(_)) => None,
        Err(e) => {
            tracing::warn!("Profile context unavailable for {}, continuing without: {}", user.0, e);
            None
        }
    };

    let reply = state.ai.assistant(&req.question, profile.as_ref()).await;

    HttpResponse::Ok().json(reply)
}

/// Content screening endpoint
///
/// POST /api/ai/moderate
async fn moderate(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    req: web::Json<ModerateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let kind = match ModerationKind::parse(&req.content_type) {
        Some(kind) => kind,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid content type".to_string(),
                message: "Content type must be one of: profile, message, event, resource"
                    .to_string(),
                status_code: 400,
            });
        }
    };

    let result = state.ai.moderate(&req.content, kind).await;

    HttpResponse::Ok().json(result)
}

/// Conversation starters endpoint
///
/// POST /api/ai/conversation-starters
async fn conversation_starters(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ConversationStartersRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    let caller = match load_profile(&state, &user.0).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    let target = match load_profile(&state, &req.target_user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let suggestions = state.ai.conversation_starters(&caller, &target).await;

    HttpResponse::Ok().json(ConversationStartersResponse { suggestions })
}

/// Event recommendations endpoint
///
/// GET /api/ai/event-recommendations
async fn event_recommendations(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> impl Responder {
    let caller = match load_profile(&state, &user.0).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let events = match state.postgres.upcoming_events(MAX_EVENT_CANDIDATES).await {
        Ok(events) => events,
        Err(e) => {
            tracing::error!("Failed to fetch upcoming events: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch events".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if events.is_empty() {
        return HttpResponse::Ok().json(EventRecommendationsResponse {
            recommendations: vec![],
        });
    }

    let recommendations = state.ai.event_recommendations(&caller, &events).await;

    HttpResponse::Ok().json(EventRecommendationsResponse { recommendations })
}
