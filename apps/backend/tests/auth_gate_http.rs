//! The authentication gate and access policy as seen over HTTP.

mod common;
mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use actix_web::dev::Service;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpMessage, HttpRequest, HttpResponse};
use async_trait::async_trait;
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::unique_helpers::unique_email;
use coffee_backend::auth::{Principal, Role, TokenService, UserLookup, UserRecord};
use coffee_backend::repos::users::set_active;
use coffee_backend::middleware::{JwtAuth, RequestTrace, RequireAuth};
use coffee_backend::{routes, AppError, CurrentUser, SecurityConfig};
use serde_json::{json, Value};
use support::auth::{bearer, register_with_token};
use support::{create_test_app, create_test_app_with, sqlite_state, state_with_lookup};

enum Behavior {
    Active,
    Fails,
    Hangs,
}

struct CountingLookup {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl CountingLookup {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl UserLookup for CountingLookup {
    async fn find(&self, id: i64) -> Result<Option<UserRecord>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Active => Ok(Some(UserRecord {
                id,
                full_name: "Remote Account".to_string(),
                email: "remote@example.test".to_string(),
                role: Role::Customer,
                is_active: true,
            })),
            Behavior::Fails => Err(AppError::db_unavailable()),
            Behavior::Hangs => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

async fn whoami(req: HttpRequest) -> HttpResponse {
    let principal = req.extensions().get::<Principal>().cloned();
    HttpResponse::Ok().json(json!({
        "authenticated": principal.is_some(),
        "authority": principal.map(|p| p.authority.as_str()),
    }))
}

async fn protected_whoami(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "id": user.id(),
        "authority": user.authority.as_str(),
    }))
}

fn probe_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/public/whoami").route(web::get().to(whoami)))
        .service(web::resource("/api/whoami").route(web::get().to(protected_whoami)));
}

#[actix_web::test]
async fn protected_route_without_token_is_401_problem() {
    let app = create_test_app(sqlite_state().await).await;

    let req = test::TestRequest::get().uri("/api/auth/me").to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    assert_eq!(problem.title, "Unauthorized");
}

#[actix_web::test]
async fn me_with_valid_token_sees_principal() {
    let app = create_test_app(sqlite_state().await).await;
    let email = unique_email("me");
    let (id, token) = register_with_token(&app, &email).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "CUSTOMER");
    assert!(body["token"].is_null());
}

#[actix_web::test]
async fn authority_comes_from_token_role() {
    let state = sqlite_state().await;
    let tokens = state.tokens.clone();
    let app = create_test_app_with(state, probe_routes).await;
    let (id, _) = register_with_token(&app, &unique_email("role")).await;

    let admin_token = tokens.issue(&id.to_string(), Role::Admin, None).unwrap();
    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(bearer(&admin_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], id);
    assert_eq!(body["authority"], "ROLE_ADMIN");
}

#[actix_web::test]
async fn rejected_tokens_leave_request_anonymous() {
    let state = sqlite_state().await;
    let tokens = state.tokens.clone();
    let app = create_test_app(state).await;
    let (id, _) = register_with_token(&app, &unique_email("reject")).await;
    let sub = id.to_string();

    let foreign = TokenService::new(&SecurityConfig::for_tests())
        .issue(&sub, Role::Customer, None)
        .unwrap();
    let expired = tokens
        .issue_at(
            &sub,
            Role::Customer,
            None,
            SystemTime::now() - Duration::from_secs(11 * 60 * 60),
        )
        .unwrap();
    let unknown_account = tokens.issue("999999", Role::Admin, None).unwrap();
    let non_numeric = tokens.issue("barista-7", Role::Customer, None).unwrap();

    for token in [
        "garbage",
        "a.b.c",
        foreign.as_str(),
        expired.as_str(),
        unknown_account.as_str(),
        non_numeric.as_str(),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    }
}

#[actix_web::test]
async fn wrong_scheme_is_anonymous() {
    let app = create_test_app(sqlite_state().await).await;

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "bearer abc.def.ghi"] {
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", value))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{value:?}");
    }
}

#[actix_web::test]
async fn deactivated_account_loses_access_immediately() {
    let state = sqlite_state().await;
    let db = state.db.clone().unwrap();
    let app = create_test_app(state).await;
    let (id, token) = register_with_token(&app, &unique_email("inactive")).await;

    let me = || {
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request()
    };
    assert_eq!(test::call_service(&app, me()).await.status(), StatusCode::OK);

    set_active(&db, id, false).await.unwrap();

    let resp = test::call_service(&app, me()).await;
    assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
}

#[actix_web::test]
async fn public_paths_never_resolve_identity() {
    let lookup = CountingLookup::new(Behavior::Active);
    let state = state_with_lookup(lookup.clone(), Duration::from_secs(1)).await;
    let token = state.tokens.issue("42", Role::Admin, None).unwrap();
    let app = create_test_app_with(state, probe_routes).await;

    for header in [None, Some("Bearer garbage".to_string()), Some(format!("Bearer {token}"))] {
        let mut req = test::TestRequest::get().uri("/api/public/whoami");
        if let Some(value) = &header {
            req = req.insert_header(("Authorization", value.clone()));
        }
        let body: Value = test::call_and_read_body_json(&app, req.to_request()).await;
        assert_eq!(body["authenticated"], false, "{header:?}");

        let mut req = test::TestRequest::get().uri("/api/public/health");
        if let Some(value) = &header {
            req = req.insert_header(("Authorization", value.clone()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "ok");
    }

    assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);

    // The same token on a protected path does resolve.
    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["authority"], "ROLE_ADMIN");
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn lookup_failure_or_timeout_is_401() {
    for behavior in [Behavior::Fails, Behavior::Hangs] {
        let lookup = CountingLookup::new(behavior);
        let state = state_with_lookup(lookup.clone(), Duration::from_millis(50)).await;
        let token = state.tokens.issue("42", Role::Customer, None).unwrap();
        let app = create_test_app(state).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}

#[actix_web::test]
async fn principal_set_before_the_gate_never_survives_it() {
    let state = sqlite_state().await;
    let stale = Principal::new(
        UserRecord {
            id: 1,
            full_name: "Planted Admin".to_string(),
            email: "planted@example.test".to_string(),
            role: Role::Admin,
            is_active: true,
        },
        Role::Admin,
    );

    let app = test::init_service(
        App::new()
            .wrap(RequireAuth)
            .wrap(JwtAuth)
            .wrap_fn(move |req, srv| {
                req.extensions_mut().insert(stale.clone());
                srv.call(req)
            })
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(probe_routes)
            .configure(routes::configure),
    )
    .await;

    for header in [None, Some("Bearer garbage")] {
        let mut req = test::TestRequest::get().uri("/api/auth/me");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_problem_details(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED).await;
    }

    // A valid token replaces the planted identity with its own.
    let (id, token) = register_with_token(&app, &unique_email("replaced")).await;
    let req = test::TestRequest::get()
        .uri("/api/whoami")
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["authority"], "ROLE_CUSTOMER");
}
