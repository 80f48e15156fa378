//! HTTP handlers for the permission catalog, preset registry and subset
//! preview.

use axum::{Json, extract::Path};
use tracing::instrument;

use sudstack_core::{
    Module, PresetKey, PresetRole, PresetSummary, SubsetReport, get_preset, is_subset,
    list_presets,
};

use crate::middleware::auth::AuthUser;
use crate::utils::errors::AppError;

use super::model::{ModuleCatalogEntry, SubsetPreviewDto};

/// The module/action taxonomy
#[utoipa::path(
    get,
    path = "/api/permissions/catalog",
    responses(
        (status = 200, description = "Modules and their valid actions", body = Vec<ModuleCatalogEntry>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_catalog(_auth_user: AuthUser) -> Json<Vec<ModuleCatalogEntry>> {
    let catalog = Module::ALL
        .iter()
        .map(|&module| ModuleCatalogEntry {
            module,
            actions: module.actions().to_vec(),
        })
        .collect();
    Json(catalog)
}

/// List preset roles (without permission tables)
#[utoipa::path(
    get,
    path = "/api/permissions/presets",
    responses(
        (status = 200, description = "Preset catalog", body = Vec<PresetSummary>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn get_presets(_auth_user: AuthUser) -> Json<Vec<PresetSummary>> {
    Json(list_presets())
}

/// One preset role with its full permission table
#[utoipa::path(
    get,
    path = "/api/permissions/presets/{key}",
    params(("key" = String, Path, description = "Preset key, e.g. financeAdmin")),
    responses(
        (status = 200, description = "Preset role", body = PresetRole),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unknown preset key")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(_auth_user))]
pub async fn get_preset_by_key(
    _auth_user: AuthUser,
    Path(key): Path<String>,
) -> Result<Json<PresetRole>, AppError> {
    let key = PresetKey::parse(&key)
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Unknown preset: {}", key)))?;
    Ok(Json(get_preset(key).clone()))
}

/// Preview whether a candidate permission set would be accepted for a
/// subordinate of the caller
#[utoipa::path(
    post,
    path = "/api/permissions/subset-preview",
    request_body = SubsetPreviewDto,
    responses(
        (status = 200, description = "Validation report with violation list", body = SubsetReport),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip_all)]
pub async fn subset_preview(
    auth_user: AuthUser,
    Json(dto): Json<SubsetPreviewDto>,
) -> Result<Json<SubsetReport>, AppError> {
    let principal = auth_user.principal()?;
    let report = is_subset(&principal.effective_permissions(), &dto.permissions);
    Ok(Json(report))
}
