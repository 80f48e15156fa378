//! Authentication extractor and permission-gated route extractors.
//!
//! [`AuthUser`] validates the bearer token and exposes the claims; its
//! [`principal`](AuthUser::principal) method resolves the typed snapshot all
//! authorization checks consume. The [`require_permission!`] macro generates
//! one extractor per guarded permission so handlers state their requirement
//! in the signature.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use sudstack_auth::{Claims, verify_token};
use sudstack_models::{AccountId, AccountRole, Principal};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;

/// Extractor that validates the JWT and provides the authenticated
/// account's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Resolve the typed principal snapshot from the claims.
    pub fn principal(&self) -> Result<Principal, AppError> {
        let id = Uuid::parse_str(&self.0.sub)
            .map(AccountId::from_uuid)
            .map_err(|_| AppError::unauthorized("Invalid account ID in token".to_string()))?;
        let role = AccountRole::parse(&self.0.role).ok_or_else(|| {
            AppError::unauthorized(format!("Invalid role in token: {}", self.0.role))
        })?;

        Ok(Principal {
            id,
            email: self.0.email.clone(),
            role,
            branch_id: self.0.branch_id,
            permissions: self.0.permissions.clone(),
        })
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Reject principals below the admin tier.
///
/// Tier gating for the account-management routes; permission gating proper
/// goes through [`crate::middleware::authorize::authorize`] and the
/// generated extractors.
pub fn require_admin_tier(principal: &Principal) -> Result<(), AppError> {
    if principal.role == AccountRole::SuperAdmin || principal.role.is_admin_tier() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Access denied. Administrator privileges required.".to_string(),
        ))
    }
}

/// Generates an extractor that authenticates the request and requires one
/// permission, via the central `authorize` primitive.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $module:expr, $action:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::utils::errors::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;
                let principal = auth_user.principal()?;

                $crate::middleware::authorize::authorize(Some(&principal), $module, $action)
                    .map_err($crate::utils::errors::AppError::from)?;

                Ok($name(auth_user))
            }
        }
    };
}

// Pre-defined permission extractors for the account-management surface.
// Handlers for other modules generate their own next to their routes.

use sudstack_core::{Action, Module};

require_permission!(RequireUsersView, Module::Users, Action::View);
require_permission!(RequireUsersCreate, Module::Users, Action::Create);
require_permission!(RequireUsersUpdate, Module::Users, Action::Update);
require_permission!(RequireUsersDelete, Module::Users, Action::Delete);
require_permission!(RequireUsersAssignRole, Module::Users, Action::AssignRole);
