//! JSON request bodies that are parsed and then checked field by field.
//!
//! Parse failures become `400 BAD_REQUEST`; whatever [`Validate`] rejects
//! keeps its own code (`INVALID_EMAIL`, `INVALID_PASSWORD`, ...) and is
//! answered with `422`.

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;

/// Account request bodies are small; anything larger is refused unread.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Field checks run after deserialization.
///
/// Implementations may normalize in place (trim names, lowercase emails) so
/// handlers only ever see canonical values.
pub trait Validate {
    fn validate(&mut self) -> Result<(), AppError>;
}

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, AppError>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let path = req.path().to_owned();
        let mut payload = payload.take();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    debug!(path = %path, error = %e, "request body read failed");
                    AppError::bad_request(ErrorCode::BadRequest, "Failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    return Err(AppError::bad_request(
                        ErrorCode::BadRequest,
                        "Request body is too large",
                    ));
                }
                body.extend_from_slice(&chunk);
            }

            let mut value = parse_body::<T>(&body).inspect_err(|_| {
                debug!(path = %path, body_size = body.len(), "rejected JSON body");
            })?;
            value.validate()?;
            Ok(ValidatedJson(value))
        })
    }
}

/// Deserialize `body`, reporting failures without echoing its contents.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %Redacted(&e.to_string()), "JSON parsing failed");
        let detail = match e.classify() {
            Category::Syntax => format!("Invalid JSON at line {}", e.line()),
            Category::Eof => "Invalid JSON: unexpected end of input".to_string(),
            Category::Data => "Invalid JSON: missing or mistyped fields".to_string(),
            Category::Io => "Invalid JSON: body could not be read".to_string(),
        };
        AppError::bad_request(ErrorCode::BadRequest, detail)
    })
}
