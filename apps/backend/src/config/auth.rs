//! Authentication gate configuration.
//!
//! `AUTH_PUBLIC_PREFIXES` overrides the default public-prefix allowlist
//! (comma-separated path prefixes). `AUTH_LOOKUP_TIMEOUT_MS` bounds the
//! account lookup the gate performs for every bearer token.

use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Prefixes exempt from authentication when nothing is configured.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] =
    &["/api/auth/register", "/api/auth/login", "/api/public/"];

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Path prefixes for which the gate does nothing and the access policy
/// admits anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths {
    prefixes: Vec<String>,
}

impl PublicPaths {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| p.starts_with('/'))
            .collect();
        Self { prefixes }
    }

    /// Parse a comma-separated list. Entries that are empty or not
    /// absolute paths are dropped; `None` when nothing usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let paths = Self::new(raw.split(','));
        if paths.prefixes.is_empty() {
            None
        } else {
            Some(paths)
        }
    }

    pub fn from_env() -> Self {
        env::var("AUTH_PUBLIC_PREFIXES")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PREFIXES)
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub public_paths: PublicPaths,
    /// Upper bound on a single account lookup; exceeding it counts as a
    /// failed verification.
    pub lookup_timeout: Duration,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let lookup_timeout = match env::var("AUTH_LOOKUP_TIMEOUT_MS") {
            Ok(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::config(format!(
                        "AUTH_LOOKUP_TIMEOUT_MS must be a positive integer, got '{raw}'"
                    ))
                })?;
                if millis == 0 {
                    return Err(AppError::config("AUTH_LOOKUP_TIMEOUT_MS must be > 0"));
                }
                Duration::from_millis(millis)
            }
            Err(_) => DEFAULT_LOOKUP_TIMEOUT,
        };

        Ok(Self {
            public_paths: PublicPaths::from_env(),
            lookup_timeout,
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            public_paths: PublicPaths::default(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }
}
