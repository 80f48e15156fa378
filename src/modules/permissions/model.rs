//! DTOs for the permission catalog endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sudstack_core::{Action, Module, PermissionSet};

/// One module of the taxonomy with its valid actions, for creation UIs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModuleCatalogEntry {
    pub module: Module,
    pub actions: Vec<Action>,
}

/// Candidate permission set to preview against the caller's own set.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubsetPreviewDto {
    pub permissions: PermissionSet,
}
