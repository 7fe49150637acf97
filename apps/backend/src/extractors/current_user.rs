use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::auth::principal::Principal;
use crate::error::AppError;

/// The authenticated caller, as published by the `JwtAuth` middleware.
///
/// Extraction fails with `401 UNAUTHORIZED` when the request is anonymous.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl CurrentUser {
    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .cloned()
                .map(CurrentUser)
                .ok_or_else(AppError::unauthorized),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::auth::claims::Role;
    use crate::auth::user_lookup::UserRecord;

    #[actix_web::test]
    async fn test_missing_principal_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = CurrentUser::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[actix_web::test]
    async fn test_principal_is_extracted() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Principal::new(
            UserRecord {
                id: 5,
                full_name: "Linus".to_string(),
                email: "linus@example.com".to_string(),
                role: Role::Customer,
                is_active: true,
            },
            Role::Customer,
        ));

        let user = CurrentUser::extract(&req).await.unwrap();
        assert_eq!(user.id(), 5);
    }
}
