pub mod claims;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod principal;
pub mod user_lookup;

pub use claims::{Claims, Role};
pub use gate::{bearer_token, AuthFailure, AuthGate, GateOutcome};
pub use jwt::{TokenError, TokenService, ACCESS_TOKEN_TTL};
pub use password::{Argon2Verifier, CredentialVerifier};
pub use principal::{Authority, Principal};
pub use user_lookup::{UserLookup, UserRecord};
