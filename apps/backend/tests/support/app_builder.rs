use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use coffee_backend::middleware::{JwtAuth, RequestTrace, RequireAuth, StructuredLogger, TraceSpan};
use coffee_backend::routes;
use coffee_backend::state::app_state::AppState;

/// Production routes behind the production middleware chain (minus CORS).
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    create_test_app_with(state, |_| {}).await
}

/// Like [`create_test_app`], with extra routes registered ahead of the
/// production ones.
pub async fn create_test_app_with<F>(
    state: AppState,
    extra_routes: F,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>
where
    F: FnOnce(&mut web::ServiceConfig),
{
    test::init_service(
        App::new()
            .wrap(RequireAuth)
            .wrap(JwtAuth)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(extra_routes)
            .configure(routes::configure),
    )
    .await
}
