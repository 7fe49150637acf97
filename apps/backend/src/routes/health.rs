use actix_web::{web, HttpResponse};
use migration::schema_state;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Liveness probe.
async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    migrations: String,
    time: String,
}

/// Readiness summary: database reachability and schema version.
async fn status(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (db, migrations) = match app_state.db() {
        Some(conn) => {
            match conn.execute_unprepared("SELECT 1").await {
                Ok(_) => {
                    let version = match schema_state(conn).await {
                        Ok(state) if !state.is_current() => "pending".to_string(),
                        Ok(state) => state.latest().unwrap_or("no_migrations").to_string(),
                        Err(_) => "unknown".to_string(),
                    };
                    ("ok", version)
                }
                Err(_) => ("error", "unknown".to_string()),
            }
        }
        None => ("absent", "unknown".to_string()),
    };

    Ok(HttpResponse::Ok().json(StatusResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        migrations,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)))
        .service(web::resource("/status").route(web::get().to(status)));
}
