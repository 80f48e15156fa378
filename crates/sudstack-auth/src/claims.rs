//! JWT claim structures.

use serde::{Deserialize, Serialize};
use sudstack_core::PermissionSet;
use sudstack_models::BranchId;
use utoipa::ToSchema;

/// JWT claims for access tokens.
///
/// Claims carry everything authorization needs: the role tag, the branch
/// scope, and the full permission set as granted at issue time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Account ID (subject claim)
    pub sub: String,
    /// Account email address
    pub email: String,
    /// Role tag (`super_admin`, `admin`, `center_admin`, `staff`)
    pub role: String,
    /// Branch scope (None for super admins and unbound admins)
    pub branch_id: Option<BranchId>,
    /// Permission grant table as stored on the account
    pub permissions: PermissionSet,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sudstack_core::{Action, Module};

    #[test]
    fn test_claims_serde_round_trip() {
        let mut permissions = PermissionSet::empty();
        permissions.set(Module::Orders, Action::View, true).unwrap();

        let claims = Claims {
            sub: "00000000-0000-0000-0000-000000000001".to_string(),
            email: "admin@suds.example".to_string(),
            role: "admin".to_string(),
            branch_id: None,
            permissions,
            exp: 9999999999,
            iat: 1234567890,
        };

        let json = serde_json::to_string(&claims).unwrap();
        let back: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, claims.sub);
        assert_eq!(back.role, "admin");
        assert!(back.permissions.read(Module::Orders, Action::View));
        assert!(!back.permissions.read(Module::Orders, Action::Create));
    }
}
