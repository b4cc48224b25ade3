use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::models::{
    CreateProfileRequest, ErrorResponse, ProfileSearchQuery, UpdateProfileRequest,
};
use crate::routes::AppState;
use crate::services::{PostgresError, MAX_EVENT_CANDIDATES};

/// Configure profile and event routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profiles")
            .route("/search", web::get().to(search_profiles))
            .route("/me", web::get().to(get_my_profile))
            .route("/me", web::put().to(update_my_profile))
            .route("", web::post().to(create_profile)),
    )
    .route("/events", web::get().to(list_events));
}

fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

/// Create the caller's profile
///
/// POST /api/profiles
async fn create_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.postgres.create_profile(&user.0, &req).await {
        Ok(profile) => {
            tracing::info!("Created profile for user {}", user.0);
            HttpResponse::Created().json(profile)
        }
        Err(PostgresError::AlreadyExists(_)) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Profile already exists".to_string(),
            message: "A profile already exists for this user".to_string(),
            status_code: 400,
        }),
        Err(e) => {
            tracing::error!("Failed to create profile for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to create profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Fetch the caller's profile
///
/// GET /api/profiles/me
async fn get_my_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.postgres.get_profile(&user.0).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(PostgresError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile for user {}", user.0),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Partially update the caller's profile
///
/// PUT /api/profiles/me
async fn update_my_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }

    match state.postgres.update_profile(&user.0, &req).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(PostgresError::NotFound(_)) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Profile not found".to_string(),
            message: format!("No profile for user {}", user.0),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to update profile for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Search visible profiles
///
/// GET /api/profiles/search
async fn search_profiles(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ProfileSearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_error(errors);
    }

    match state.postgres.search_profiles(&user.0, &query).await {
        Ok(profiles) => {
            tracing::info!("Search by {} returned {} profiles", user.0, profiles.len());
            HttpResponse::Ok().json(profiles)
        }
        Err(e) => {
            tracing::error!("Profile search failed for {}: {}", user.0, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Search failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// List upcoming events
///
/// GET /api/events
async fn list_events(state: web::Data<AppState>, _user: AuthenticatedUser) -> impl Responder {
    match state.postgres.upcoming_events(MAX_EVENT_CANDIDATES).await {
        Ok(events) => HttpResponse::Ok().json(events),
        Err(e) => {
            tracing::error!("Failed to list events: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list events".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
