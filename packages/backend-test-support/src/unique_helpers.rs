//! ULID-based unique values so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}@example.test`, lowercased like stored emails.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let a = unique_email("barista");
/// assert_ne!(a, unique_email("barista"));
/// assert!(a.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}

pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}
