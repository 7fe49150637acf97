//! Redaction of personal data and credentials in log output.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Compiled patterns used by [`redact`]. All are vetted literals.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Compact JWT: three base64url segments joined by dots.
    pub fn jwt() -> &'static Regex {
        static JWT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}").unwrap()
        });
        &JWT_REGEX
    }

    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Opaque base64 or hex run of at least 16 characters.
    pub fn opaque_token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}").unwrap()
        });
        &TOKEN_REGEX
    }
}

/// Masks credentials and emails in free text.
///
/// JWTs go first so their segments are not half-matched by the opaque token
/// pattern. Emails keep the first character of the local part and the domain.
pub fn redact(input: &str) -> String {
    let without_jwts = PiiRegexRegistry::jwt().replace_all(input, "[REDACTED_JWT]");

    let without_emails =
        PiiRegexRegistry::email().replace_all(&without_jwts, |caps: &regex::Captures| {
            let full = &caps[0];
            match full.split_once('@') {
                Some((local, domain)) => match local.chars().next() {
                    Some(first) => format!("{first}***@{domain}"),
                    None => format!("@{domain}"),
                },
                None => full.to_string(),
            }
        });

    PiiRegexRegistry::opaque_token()
        .replace_all(&without_emails, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that redacts on format, for use in tracing fields:
/// `email = %Redacted(&email)`.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
