//! Role names and the authorization decisions built on them.
//!
//! The role stored on the caller's profile is the only authorization signal.
//! Any doubt about it (lookup error, missing profile, inactive profile,
//! unrecognised role string) denies access.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// These must match the `chk_user_profiles_role` constraint in the migrations.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_USER => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The subset of a profile row needed to make an authorization decision.
#[derive(Debug, Clone)]
pub struct RoleLookup {
    pub role: String,
    pub is_active: bool,
}

/// Decide whether a role lookup belongs to an active account.
///
/// Returns the resolved role. A failed lookup, a missing or inactive profile
/// and an unrecognised role string all yield [`CoreError::Forbidden`].
pub fn authorize_active<E: fmt::Display>(
    lookup: Result<Option<RoleLookup>, E>,
) -> Result<Role, CoreError> {
    let profile = match lookup {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::warn!("Role lookup returned no profile, denying access");
            return Err(CoreError::Forbidden("Active account required".into()));
        }
        Err(e) => {
            tracing::warn!(error = %e, "Role lookup failed, denying access");
            return Err(CoreError::Forbidden("Active account required".into()));
        }
    };

    if !profile.is_active {
        return Err(CoreError::Forbidden("Account is deactivated".into()));
    }

    Role::parse(&profile.role)
        .ok_or_else(|| CoreError::Forbidden("Active account required".into()))
}

/// Decide whether a role lookup grants administrative access.
///
/// Returns the resolved [`Role::Admin`] on success and
/// [`CoreError::Forbidden`] for every other outcome, including a failed lookup.
pub fn authorize_admin<E: fmt::Display>(
    lookup: Result<Option<RoleLookup>, E>,
) -> Result<Role, CoreError> {
    match authorize_active(lookup)? {
        Role::Admin => Ok(Role::Admin),
        Role::User => Err(CoreError::Forbidden("Admin role required".into())),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn lookup(role: &str, is_active: bool) -> Result<Option<RoleLookup>, String> {
        Ok(Some(RoleLookup {
            role: role.to_string(),
            is_active,
        }))
    }

    #[test]
    fn active_admin_is_authorized() {
        assert_eq!(authorize_admin(lookup("admin", true)).unwrap(), Role::Admin);
    }

    #[test]
    fn user_role_is_forbidden() {
        assert_matches!(
            authorize_admin(lookup("user", true)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn inactive_admin_is_forbidden() {
        assert_matches!(
            authorize_admin(lookup("admin", false)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn missing_profile_fails_closed() {
        let result = authorize_admin::<String>(Ok(None));
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn lookup_error_fails_closed() {
        let result = authorize_admin::<String>(Err("connection reset".into()));
        assert_matches!(result, Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn unknown_role_string_fails_closed() {
        assert_matches!(
            authorize_admin(lookup("Admin ", true)),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize_admin(lookup("superuser", true)),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn active_accounts_of_either_role_pass() {
        assert_eq!(authorize_active(lookup("user", true)).unwrap(), Role::User);
        assert_eq!(authorize_active(lookup("admin", true)).unwrap(), Role::Admin);
    }

    #[test]
    fn deactivated_account_is_not_active() {
        assert_matches!(
            authorize_active(lookup("user", false)),
            Err(CoreError::Forbidden(msg)) if msg == "Account is deactivated"
        );
        assert_matches!(
            authorize_active::<String>(Ok(None)),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            authorize_active::<String>(Err("pool timed out".into())),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn parse_round_trips_known_roles() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
