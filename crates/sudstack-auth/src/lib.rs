//! # Sudstack Auth
//!
//! Authentication types and JWT utilities for the Sudstack API.
//!
//! Access tokens embed the account's role tag, branch scope, and full
//! permission set, so authorization decisions need no database lookup:
//! the middleware resolves a principal straight from the verified claims.
//!
//! # Example
//!
//! ```ignore
//! use sudstack_auth::{create_access_token, verify_token};
//! use sudstack_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(&account, &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
