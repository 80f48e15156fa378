//! # Sudstack Core
//!
//! Core permission model, errors, and utilities for the Sudstack API.
//!
//! This crate provides the foundational types used throughout the Sudstack
//! application:
//!
//! - [`taxonomy`]: the fixed module/action permission catalog
//! - [`permission_set`]: the per-account module → action → bool grant table
//! - [`subset`]: the dominance check between two permission sets
//! - [`presets`]: named, immutable permission templates
//! - [`audit`]: audit event structure and sink contract
//! - [`errors`]: application error types with HTTP response conversion
//! - [`pagination`]: pagination utilities for list endpoints
//!
//! # Example
//!
//! ```ignore
//! use sudstack_core::{Action, Module, PermissionSet, is_subset};
//!
//! let mut admin = PermissionSet::empty();
//! admin.set(Module::Orders, Action::View, true)?;
//! admin.set(Module::Orders, Action::Create, true)?;
//!
//! let mut staff = PermissionSet::empty();
//! staff.set(Module::Orders, Action::View, true)?;
//!
//! assert!(is_subset(&admin, &staff).is_valid);
//! ```

pub mod audit;
pub mod errors;
pub mod pagination;
pub mod permission_set;
pub mod presets;
pub mod subset;
pub mod taxonomy;

// Re-export commonly used types at crate root
pub use audit::{AuditEvent, AuditSink, AuditStatus, MemoryAuditSink, RiskLevel, TracingAuditSink};
pub use errors::{AppError, AuthzError};
pub use pagination::{PaginationMeta, PaginationParams};
pub use permission_set::PermissionSet;
pub use presets::{PresetKey, PresetRole, PresetSummary, get_preset, list_presets};
pub use subset::{SubsetReport, is_subset};
pub use taxonomy::{Action, InvalidModuleOrAction, Module, permission_label};
