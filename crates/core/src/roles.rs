//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000001_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Whether `role` names a known role.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_USER
}
