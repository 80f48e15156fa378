//! Request and response DTOs for account management.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use sudstack_core::{PaginationMeta, PaginationParams, PermissionSet, PresetKey};
use sudstack_models::{Account, BranchId};

/// Payload for creating an admin or center-admin account.
///
/// Permissions come from an explicit set, a preset shortcut, or both (the
/// explicit set wins). The account kind is fixed by the endpoint, never by
/// the payload.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdminDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub permissions: Option<PermissionSet>,
    /// Preset template to copy permissions from.
    pub preset: Option<PresetKey>,
    /// Branch binding; required when creating a center admin.
    pub branch_id: Option<BranchId>,
}

/// Payload for creating a staff account.
///
/// No branch field: staff inherit the creating admin's branch verbatim.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStaffDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub permissions: Option<PermissionSet>,
    pub preset: Option<PresetKey>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePermissionsDto {
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DeactivateDto {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Result of a deactivation, including how many created accounts were
/// cascaded in the same operation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeactivateResponse {
    pub account: Account,
    pub cascaded_count: u64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AccountFilterParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedAccountsResponse {
    pub data: Vec<Account>,
    pub meta: PaginationMeta,
}
