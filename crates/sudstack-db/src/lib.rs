//! # Sudstack DB
//!
//! Database pool initialization for the Sudstack API (SQLx + PostgreSQL).
//!
//! # Example
//!
//! ```ignore
//! use sudstack_db::init_db_pool;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pool = init_db_pool().await;
//! }
//! ```

use std::env;

/// Initializes a PostgreSQL connection pool from `DATABASE_URL`.
///
/// Call once during startup; the returned pool is cheaply cloneable and is
/// shared through the application state.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset or the database is unreachable.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
