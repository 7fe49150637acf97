use actix_web::{web, App, HttpServer};
use coffee_backend::config::auth::AuthConfig;
use coffee_backend::config::db::database_url;
use coffee_backend::infra::state::build_state;
use coffee_backend::middleware::{
    cors_middleware, JwtAuth, RequestTrace, RequireAuth, StructuredLogger, TraceSpan,
};
use coffee_backend::routes;
use coffee_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let security_config = SecurityConfig::from_env();
    let auth_config = AuthConfig::from_env();
    let db_url = database_url();

    let (security_config, auth_config, db_url) = match (security_config, auth_config, db_url) {
        (Ok(s), Ok(a), Ok(d)) => (s, a, d),
        (s, a, d) => {
            for e in [s.err(), a.err(), d.err()].into_iter().flatten() {
                error!(error = %e, "invalid configuration");
            }
            std::process::exit(1);
        }
    };

    info!(
        public_prefixes = ?auth_config.public_paths.prefixes(),
        lookup_timeout = ?auth_config.lookup_timeout,
        "auth configured"
    );

    let app_state = match build_state()
        .with_security(security_config)
        .with_auth_config(auth_config)
        .with_db_url(db_url)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(app_state);

    info!(%host, port, "starting coffee backend");

    // The last `.wrap()` runs first.
    HttpServer::new(move || {
        App::new()
            .wrap(RequireAuth)
            .wrap(JwtAuth)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .wrap(cors_middleware())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
