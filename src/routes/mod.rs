// Route exports
pub mod ai;
pub mod profiles;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::auth::Authenticator;
use crate::models::HealthResponse;
use crate::services::{AiService, PostgresClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub postgres: Arc<PostgresClient>,
    pub ai: Arc<AiService>,
    pub auth: Arc<dyn Authenticator>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .configure(ai::configure)
            .configure(profiles::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
