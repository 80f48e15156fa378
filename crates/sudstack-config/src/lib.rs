//! # Sudstack Config
//!
//! Configuration types for the Sudstack API, loaded from environment
//! variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS configuration
//! - [`rate_limit`]: rate limiting configuration and the injectable
//!   [`rate_limit::RateLimiter`] interface
//!
//! # Example
//!
//! ```ignore
//! use sudstack_config::{CorsConfig, JwtConfig, RateLimitConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let rate_limit_config = RateLimitConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod rate_limit;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use rate_limit::{InProcessRateLimiter, RateLimitConfig, RateLimiter};
