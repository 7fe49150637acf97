//! Account registration and password login.

use std::sync::LazyLock;

use regex::Regex;
use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::auth::claims::Role;
use crate::auth::jwt::TokenService;
use crate::auth::password::CredentialVerifier;
use crate::auth::user_lookup::UserRecord;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, NewUser};

const FULL_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=120;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=255;
const EMAIL_MAX_LEN: usize = 255;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap()
});

#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// An account together with a freshly minted access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserRecord,
    pub token: String,
}

/// Trim and lowercase.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_full_name(full_name: &str) -> Result<String, AppError> {
    let trimmed = full_name.trim();
    if !FULL_NAME_LEN.contains(&trimmed.chars().count()) {
        return Err(AppError::invalid(
            ErrorCode::InvalidFullName,
            "Full name must be between 2 and 120 characters",
        ));
    }
    Ok(trimmed.to_string())
}

/// Returns the normalized address.
pub fn validate_email(email: &str) -> Result<String, AppError> {
    let normalized = normalize_email(email);
    if normalized.len() > EMAIL_MAX_LEN || !EMAIL_REGEX.is_match(&normalized) {
        return Err(AppError::invalid(
            ErrorCode::InvalidEmail,
            "Email address is not valid",
        ));
    }
    Ok(normalized)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if !PASSWORD_LEN.contains(&password.chars().count()) {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            "Password must be between 8 and 255 characters",
        ));
    }
    Ok(())
}

/// Create an active `CUSTOMER` account and sign it in.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credentials: &dyn CredentialVerifier,
    tokens: &TokenService,
    registration: Registration,
) -> Result<Session, AppError> {
    let full_name = validate_full_name(&registration.full_name)?;
    let email = validate_email(&registration.email)?;
    validate_password(&registration.password)?;

    if users::email_exists(conn, &email).await? {
        debug!(email = %Redacted(&email), "registration for taken email");
        return Err(email_taken());
    }

    let password_hash = credentials.hash(&registration.password)?;
    let created = users::create_user(
        conn,
        NewUser {
            full_name: &full_name,
            email: &email,
            password_hash: &password_hash,
            role: Role::Customer,
        },
    )
    .await
    .map_err(|e| match e {
        // Lost a race with a concurrent registration.
        AppError::Conflict { .. } => email_taken(),
        other => other,
    })?;

    info!(user_id = created.id, email = %Redacted(&email), "account registered");

    let user = UserRecord::from(created);
    let token = tokens.issue(&user.id.to_string(), user.role, Some(&user.email))?;
    Ok(Session { user, token })
}

/// Check email and password. Every failure is the same `INVALID_CREDENTIALS`.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credentials: &dyn CredentialVerifier,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let email = normalize_email(email);

    let Some(model) = users::find_user_by_email(conn, &email).await? else {
        debug!(email = %Redacted(&email), "login for unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !credentials.matches(password, &model.password_hash) {
        debug!(user_id = model.id, "login with wrong password");
        return Err(AppError::invalid_credentials());
    }

    if !model.is_active {
        debug!(user_id = model.id, "login for inactive account");
        return Err(AppError::invalid_credentials());
    }

    let user = UserRecord::from(model);
    let token = tokens.issue(&user.id.to_string(), user.role, Some(&user.email))?;
    info!(user_id = user.id, "login succeeded");
    Ok(Session { user, token })
}

fn email_taken() -> AppError {
    AppError::conflict(ErrorCode::EmailTaken, "Email is already registered")
}
