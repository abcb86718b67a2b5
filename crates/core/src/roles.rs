//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20261001000002_create_users_table.sql`.

use crate::error::CoreError;

pub const ROLE_ARTIST: &str = "artist";
pub const ROLE_ORGANIZER: &str = "organizer";
pub const ROLE_ADMIN: &str = "admin";

/// All roles a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ARTIST, ROLE_ORGANIZER, ROLE_ADMIN];

/// Roles a user may pick for themselves at registration. Admins are
/// provisioned out of band.
pub const SELF_REGISTER_ROLES: &[&str] = &[ROLE_ARTIST, ROLE_ORGANIZER];

/// Validate that a role string is one of the known roles.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// Validate a role chosen during self-registration.
pub fn validate_registration_role(role: &str) -> Result<(), CoreError> {
    if SELF_REGISTER_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot register as '{role}'. Must be one of: {}",
            SELF_REGISTER_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
        assert!(validate_role("superuser").is_err());
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(validate_registration_role(ROLE_ARTIST).is_ok());
        assert!(validate_registration_role(ROLE_ORGANIZER).is_ok());
        assert!(validate_registration_role(ROLE_ADMIN).is_err());
        assert!(validate_registration_role("").is_err());
    }
}
