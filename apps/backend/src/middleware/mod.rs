pub mod access_policy;
pub mod cors;
pub mod jwt_auth;
pub mod request_trace;
pub mod structured_logger;
pub mod trace_span;

pub use access_policy::RequireAuth;
pub use cors::cors_middleware;
pub use jwt_auth::JwtAuth;
pub use request_trace::{RequestTrace, TraceId};
pub use structured_logger::StructuredLogger;
pub use trace_span::TraceSpan;
