use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod auth;
pub mod health;

/// Register every route. `main.rs` and the integration tests wrap the
/// result in the same middleware stack.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Account routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // Anonymous read surface: /api/public/**
    cfg.service(web::scope("/api/public").configure(health::configure_routes));

    cfg.default_service(web::to(not_found));
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        ErrorCode::NotFound,
        format!("No route for {}", req.path()),
    ))
}
