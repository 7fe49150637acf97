use std::sync::Arc;
use std::time::Duration;

use coffee_backend::auth::UserLookup;
use coffee_backend::config::auth::AuthConfig;
use coffee_backend::infra::state::build_state;
use coffee_backend::state::app_state::AppState;
use coffee_backend::SecurityConfig;

/// Fresh, migrated in-memory SQLite database behind a random signing key.
pub async fn sqlite_state() -> AppState {
    build_state()
        .with_security(SecurityConfig::for_tests())
        .with_db_url("sqlite::memory:")
        .build()
        .await
        .expect("build sqlite test state")
}

/// No database; the gate resolves accounts through `lookup`.
pub async fn state_with_lookup(lookup: Arc<dyn UserLookup>, lookup_timeout: Duration) -> AppState {
    build_state()
        .with_security(SecurityConfig::for_tests())
        .with_auth_config(AuthConfig {
            lookup_timeout,
            ..AuthConfig::default()
        })
        .with_user_lookup(lookup)
        .build()
        .await
        .expect("build lookup-only test state")
}
