//! # Sudstack Models
//!
//! Domain entities for the Sudstack API: strongly-typed IDs, the account
//! hierarchy, and the request-time principal snapshot.

pub mod accounts;
pub mod ids;

// Re-export commonly used types at crate root
pub use accounts::{Account, AccountRole, Principal};
pub use ids::{AccountId, BranchId};
