use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::auth::claims::Role;
use crate::auth::user_lookup::UserRecord;
use crate::error::AppError;
use crate::extractors::{CurrentUser, Validate, ValidatedJson};
use crate::services::users::{self, Registration};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&mut self) -> Result<(), AppError> {
        self.full_name = users::validate_full_name(&self.full_name)?;
        self.email = users::validate_email(&self.email)?;
        users::validate_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login never reports field errors; a bad address simply matches no account.
impl Validate for LoginRequest {
    fn validate(&mut self) -> Result<(), AppError> {
        self.email = users::normalize_email(&self.email);
        Ok(())
    }
}

/// Body shared by register, login and me. `token` is `null` for `me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub ok: bool,
    pub token: Option<String>,
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
}

impl AuthResponse {
    fn new(user: UserRecord, token: Option<String>) -> Self {
        Self {
            ok: true,
            token,
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
        }
    }
}

async fn register(
    body: ValidatedJson<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let db = app_state.require_db()?;

    let session = users::register(
        db,
        app_state.credentials.as_ref(),
        &app_state.tokens,
        Registration {
            full_name: body.full_name,
            email: body.email,
            password: body.password,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(session.user, Some(session.token))))
}

async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;

    let session = users::login(
        db,
        app_state.credentials.as_ref(),
        &app_state.tokens,
        &body.email,
        &body.password,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(session.user, Some(session.token))))
}

async fn me(current_user: CurrentUser) -> Result<HttpResponse, AppError> {
    let principal = current_user.into_inner();
    Ok(HttpResponse::Ok().json(AuthResponse::new(principal.account, None)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/me").route(web::get().to(me)));
}
