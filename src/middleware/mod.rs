//! Middleware for authentication and authorization.
//!
//! - [`auth`]: bearer-token extractor, principal resolution, and the
//!   `require_permission!` extractor macro
//! - [`authorize`]: the pure request-time decision procedure and its
//!   variants (`require_all`, `require_any`, `require_module_access`)
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the token and exposes the claims
//! 3. The claims resolve into a [`sudstack_models::Principal`] snapshot
//! 4. [`authorize::authorize`] decides allow/deny; handlers run only on allow
//!
//! Role tags are compared in exactly one place (the super-admin bypass in
//! `authorize`); everything else consumes the decision.

pub mod auth;
pub mod authorize;
