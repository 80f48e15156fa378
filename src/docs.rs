use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use sudstack_core::pagination::{PaginationMeta, PaginationParams};
use sudstack_core::permission_set::PermissionSet;
use sudstack_core::presets::{PresetKey, PresetRole, PresetSummary};
use sudstack_core::subset::SubsetReport;
use sudstack_core::taxonomy::{Action, Module};
use sudstack_models::accounts::{Account, AccountRole};

use crate::modules::accounts::model::{
    AccountFilterParams, CreateAdminDto, CreateStaffDto, DeactivateDto, DeactivateResponse,
    PaginatedAccountsResponse, UpdatePermissionsDto,
};
use crate::modules::permissions::model::{ModuleCatalogEntry, SubsetPreviewDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::accounts::controller::create_admin,
        crate::modules::accounts::controller::create_center_admin,
        crate::modules::accounts::controller::create_staff,
        crate::modules::accounts::controller::list_accounts,
        crate::modules::accounts::controller::get_account,
        crate::modules::accounts::controller::list_created_accounts,
        crate::modules::accounts::controller::update_permissions,
        crate::modules::accounts::controller::deactivate_account,
        crate::modules::accounts::controller::reactivate_account,
        crate::modules::permissions::controller::get_catalog,
        crate::modules::permissions::controller::get_presets,
        crate::modules::permissions::controller::get_preset_by_key,
        crate::modules::permissions::controller::subset_preview,
    ),
    components(
        schemas(
            Account,
            AccountRole,
            Module,
            Action,
            PermissionSet,
            PresetKey,
            PresetRole,
            PresetSummary,
            SubsetReport,
            CreateAdminDto,
            CreateStaffDto,
            UpdatePermissionsDto,
            DeactivateDto,
            DeactivateResponse,
            AccountFilterParams,
            PaginatedAccountsResponse,
            ModuleCatalogEntry,
            SubsetPreviewDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Hierarchical account management"),
        (name = "Permissions", description = "Permission catalog, presets and subset preview")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
