//! The request-scoped authenticated identity.

use std::fmt;

use serde::Serialize;

use crate::auth::claims::Role;
use crate::auth::user_lookup::UserRecord;

/// In-process authorization capability. Decoupled from the wire role label
/// so handlers never compare strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Authority {
    #[serde(rename = "ROLE_CUSTOMER")]
    RoleCustomer,
    #[serde(rename = "ROLE_ADMIN")]
    RoleAdmin,
}

impl Authority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Authority::RoleCustomer => "ROLE_CUSTOMER",
            Authority::RoleAdmin => "ROLE_ADMIN",
        }
    }
}

impl From<Role> for Authority {
    fn from(role: Role) -> Self {
        match role {
            Role::Customer => Authority::RoleCustomer,
            Role::Admin => Authority::RoleAdmin,
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity attached to one in-flight request by the authentication gate.
///
/// `account` is the store's view of the user; `authority` comes from the
/// token's role claim, which is trusted until the token expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub account: UserRecord,
    pub authority: Authority,
}

impl Principal {
    pub fn new(account: UserRecord, token_role: Role) -> Self {
        Self {
            account,
            authority: Authority::from(token_role),
        }
    }

    pub fn id(&self) -> i64 {
        self.account.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(role: Role) -> UserRecord {
        UserRecord {
            id: 42,
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            role,
            is_active: true,
        }
    }

    #[test]
    fn test_role_to_authority_mapping() {
        assert_eq!(Authority::from(Role::Admin).as_str(), "ROLE_ADMIN");
        assert_eq!(Authority::from(Role::Customer).as_str(), "ROLE_CUSTOMER");
    }

    #[test]
    fn test_authority_follows_token_role() {
        let principal = Principal::new(account(Role::Customer), Role::Admin);
        assert_eq!(principal.id(), 42);
        assert_eq!(principal.authority, Authority::RoleAdmin);
        assert_eq!(principal.account.role, Role::Customer);
    }

    #[test]
    fn test_authority_serializes_as_prefixed_label() {
        assert_eq!(
            serde_json::to_string(&Authority::RoleAdmin).unwrap(),
            "\"ROLE_ADMIN\""
        );
    }
}
