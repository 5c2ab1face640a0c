//! Ownership and role checks for user-owned resources.
//!
//! Handlers resolve the resource first (reporting `NotFound` when it is
//! missing) and only then ask these helpers whether the caller may touch it.

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The authenticated caller as seen by authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor<'a> {
    pub user_id: DbId,
    pub role: &'a str,
}

impl<'a> Actor<'a> {
    pub fn new(user_id: DbId, role: &'a str) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Allow the owner of a resource or any admin.
pub fn require_ownership_or_admin(owner_id: DbId, actor: Actor<'_>) -> Result<(), CoreError> {
    if owner_id == actor.user_id || actor.is_admin() {
        return Ok(());
    }
    Err(CoreError::Forbidden("Access denied".into()))
}

/// Allow admins only.
pub fn require_admin(actor: Actor<'_>) -> Result<(), CoreError> {
    if actor.is_admin() {
        return Ok(());
    }
    Err(CoreError::Forbidden("Admin access required".into()))
}

/// Allow the owner only; admins get no bypass.
pub fn require_ownership(owner_id: DbId, actor: Actor<'_>) -> Result<(), CoreError> {
    if owner_id == actor.user_id {
        return Ok(());
    }
    Err(CoreError::Forbidden(
        "You do not have permission to access this resource".into(),
    ))
}

/// Owner filter to apply to a listing query.
///
/// Returns `None` when the caller may see every row (admins, unless
/// `force_user_scope` is set) and `Some(user_id)` otherwise.
pub fn scope_to_user(actor: Actor<'_>, force_user_scope: bool) -> Option<DbId> {
    if actor.is_admin() && !force_user_scope {
        None
    } else {
        Some(actor.user_id)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::roles::ROLE_USER;

    const ADMIN: Actor<'static> = Actor {
        user_id: 1,
        role: ROLE_ADMIN,
    };
    const ALICE: Actor<'static> = Actor {
        user_id: 2,
        role: ROLE_USER,
    };

    #[test]
    fn owner_passes_ownership_or_admin() {
        assert!(require_ownership_or_admin(2, ALICE).is_ok());
    }

    #[test]
    fn admin_passes_ownership_or_admin() {
        assert!(require_ownership_or_admin(2, ADMIN).is_ok());
    }

    #[test]
    fn stranger_is_forbidden() {
        assert_matches!(
            require_ownership_or_admin(3, ALICE),
            Err(CoreError::Forbidden(msg)) if msg == "Access denied"
        );
    }

    #[test]
    fn require_admin_rejects_plain_user() {
        assert!(require_admin(ADMIN).is_ok());
        assert_matches!(require_admin(ALICE), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn strict_ownership_has_no_admin_bypass() {
        assert!(require_ownership(2, ALICE).is_ok());
        assert_matches!(require_ownership(2, ADMIN), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn admins_are_unscoped_unless_forced() {
        assert_eq!(scope_to_user(ADMIN, false), None);
        assert_eq!(scope_to_user(ADMIN, true), Some(1));
    }

    #[test]
    fn users_are_always_scoped() {
        assert_eq!(scope_to_user(ALICE, false), Some(2));
        assert_eq!(scope_to_user(ALICE, true), Some(2));
    }
}
