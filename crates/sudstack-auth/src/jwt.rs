//! JWT creation and verification.
//!
//! Access tokens are issued against an [`Account`] snapshot and verified
//! back into [`Claims`]. Verification failures surface as unauthorized
//! errors; token mechanics never leak into authorization decisions.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use sudstack_config::JwtConfig;
use sudstack_core::AppError;
use sudstack_models::Account;

use crate::claims::Claims;

/// Creates an access token embedding the account's role, branch scope and
/// permission set.
///
/// # Errors
///
/// Returns an error if token encoding fails (e.g. invalid secret key).
pub fn create_access_token(account: &Account, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: account.id.to_string(),
        email: account.email.clone(),
        role: account.role.as_str().to_string(),
        branch_id: account.branch_id,
        permissions: account.permissions.clone(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error when the signature is invalid, the token
/// has expired, or the token is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token".to_string()))
}
