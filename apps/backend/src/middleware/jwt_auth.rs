//! Runs the authentication gate for every request.
//!
//! Clears any principal already present in request extensions, asks the
//! [`AuthGate`](crate::auth::AuthGate) held in `AppState` for a decision and
//! stores the resulting [`Principal`] on success. Never rejects a request;
//! that is `RequireAuth`'s job.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::error;

use crate::auth::Principal;
use crate::state::app_state::AppState;

pub struct JwtAuth;

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            req.extensions_mut().remove::<Principal>();

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                error!("AppState not registered; request stays anonymous");
                return service.call(req).await;
            };

            // Non-ASCII header values count as absent.
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let path = req.path().to_owned();

            if let Some(principal) = state
                .gate
                .authenticate(&path, authorization.as_deref())
                .await
                .into_principal()
            {
                req.extensions_mut().insert(principal);
            }

            service.call(req).await
        })
    }
}
