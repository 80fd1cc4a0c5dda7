//! RBAC helpers for role-based route guarding.

use tokengate_core::error::AppError;
use tokengate_core::types::PrincipalType;

use crate::extractors::AuthPrincipal;

/// Checks that the authenticated principal is of the given type.
pub fn require_role(auth: &AuthPrincipal, role: PrincipalType) -> Result<(), AppError> {
    require_any_role(auth, &[role])
}

/// Checks that the authenticated principal is one of the given types.
pub fn require_any_role(auth: &AuthPrincipal, roles: &[PrincipalType]) -> Result<(), AppError> {
    if roles.contains(&auth.principal_type) {
        return Ok(());
    }
    let names: Vec<_> = roles.iter().map(|r| r.display_name()).collect();
    Err(AppError::forbidden(format!("{} access required", names.join(" or "))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokengate_core::error::ErrorKind;
    use tokengate_core::types::CanonicalPrincipal;

    fn member() -> AuthPrincipal {
        AuthPrincipal(CanonicalPrincipal::new(PrincipalType::Subscriber, "9998887777"))
    }

    #[test]
    fn test_wrong_role_is_forbidden() {
        let err = require_role(&member(), PrincipalType::SuperAdmin).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "Super Admin access required");
    }

    #[test]
    fn test_any_role_accepts_member() {
        assert!(
            require_any_role(
                &member(),
                &[PrincipalType::EntityAdmin, PrincipalType::Subscriber]
            )
            .is_ok()
        );
    }
}
