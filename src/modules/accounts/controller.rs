//! HTTP handlers for account management.
//!
//! Handlers stay thin: extract the principal, delegate to the service,
//! convert domain errors. Permission gating happens in the extractor
//! signatures; the tier rules live in the service.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use sudstack_core::PaginationMeta;
use sudstack_models::{Account, AccountId};
use uuid::Uuid;

use crate::middleware::auth::{
    RequireUsersAssignRole, RequireUsersCreate, RequireUsersDelete, RequireUsersUpdate,
    RequireUsersView,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

use super::model::{
    AccountFilterParams, CreateAdminDto, CreateStaffDto, DeactivateDto, DeactivateResponse,
    PaginatedAccountsResponse, UpdatePermissionsDto,
};

/// Create an admin account
#[utoipa::path(
    post,
    path = "/api/accounts/admins",
    request_body = CreateAdminDto,
    responses(
        (status = 200, description = "Admin account created", body = Account),
        (status = 403, description = "Actor may not create admin accounts"),
        (status = 409, description = "Email or phone already in use"),
        (status = 422, description = "Invalid payload or permissions")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_admin(
    State(state): State<AppState>,
    RequireUsersCreate(auth_user): RequireUsersCreate,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state.accounts.create_admin(&principal, dto).await?;
    Ok(Json(account))
}

/// Create a center-admin account (branch binding required)
#[utoipa::path(
    post,
    path = "/api/accounts/center-admins",
    request_body = CreateAdminDto,
    responses(
        (status = 200, description = "Center admin account created", body = Account),
        (status = 403, description = "Actor may not create admin accounts"),
        (status = 409, description = "Email or phone already in use"),
        (status = 422, description = "Missing branch, invalid payload or permissions")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_center_admin(
    State(state): State<AppState>,
    RequireUsersCreate(auth_user): RequireUsersCreate,
    ValidatedJson(dto): ValidatedJson<CreateAdminDto>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state.accounts.create_center_admin(&principal, dto).await?;
    Ok(Json(account))
}

/// Create a staff account (branch inherited from the creating admin)
#[utoipa::path(
    post,
    path = "/api/accounts/staff",
    request_body = CreateStaffDto,
    responses(
        (status = 200, description = "Staff account created", body = Account),
        (status = 403, description = "Actor may not create staff accounts"),
        (status = 409, description = "Email or phone already in use"),
        (status = 422, description = "Permissions exceed the creator's")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_staff(
    State(state): State<AppState>,
    RequireUsersCreate(auth_user): RequireUsersCreate,
    ValidatedJson(dto): ValidatedJson<CreateStaffDto>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state.accounts.create_staff(&principal, dto).await?;
    Ok(Json(account))
}

/// List accounts
#[utoipa::path(
    get,
    path = "/api/accounts",
    params(
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Page of accounts", body = PaginatedAccountsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing users.view permission")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    RequireUsersView(_auth_user): RequireUsersView,
    Query(params): Query<AccountFilterParams>,
) -> Result<Json<PaginatedAccountsResponse>, AppError> {
    let limit = params.pagination.limit();
    let offset = params.pagination.offset();
    let (accounts, total) = state.accounts.list_accounts(limit, offset).await?;
    let meta = PaginationMeta::new(total, &params.pagination, accounts.len());
    Ok(Json(PaginatedAccountsResponse {
        data: accounts,
        meta,
    }))
}

/// Get one account
#[utoipa::path(
    get,
    path = "/api/accounts/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 403, description = "Actor has no authority over this account"),
        (status = 404, description = "Account not found")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    RequireUsersView(auth_user): RequireUsersView,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state
        .accounts
        .get_account(&principal, AccountId::from_uuid(id))
        .await?;
    Ok(Json(account))
}

/// List the accounts created by one account
#[utoipa::path(
    get,
    path = "/api/accounts/{id}/created",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Accounts created by this account", body = Vec<Account>),
        (status = 403, description = "Actor may only list its own roster"),
        (status = 404, description = "Account not found")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_created_accounts(
    State(state): State<AppState>,
    RequireUsersView(auth_user): RequireUsersView,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Account>>, AppError> {
    let principal = auth_user.principal()?;
    let accounts = state
        .accounts
        .list_created(&principal, AccountId::from_uuid(id))
        .await?;
    Ok(Json(accounts))
}

/// Replace an account's permission set
#[utoipa::path(
    put,
    path = "/api/accounts/{id}/permissions",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdatePermissionsDto,
    responses(
        (status = 200, description = "Permissions updated", body = Account),
        (status = 403, description = "Actor has no authority over this account"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Concurrent modification, retry"),
        (status = 422, description = "Empty set or permissions exceed the actor's")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_permissions(
    State(state): State<AppState>,
    RequireUsersAssignRole(auth_user): RequireUsersAssignRole,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePermissionsDto>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state
        .accounts
        .update_permissions(&principal, AccountId::from_uuid(id), dto.permissions)
        .await?;
    Ok(Json(account))
}

/// Deactivate an account (cascades over its created accounts)
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = DeactivateDto,
    responses(
        (status = 200, description = "Account deactivated", body = DeactivateResponse),
        (status = 403, description = "Actor has no authority over this account"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Account already deactivated")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn deactivate_account(
    State(state): State<AppState>,
    RequireUsersDelete(auth_user): RequireUsersDelete,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<DeactivateDto>,
) -> Result<Json<DeactivateResponse>, AppError> {
    let principal = auth_user.principal()?;
    let (account, cascaded_count) = state
        .accounts
        .deactivate(&principal, AccountId::from_uuid(id), &dto.reason)
        .await?;
    Ok(Json(DeactivateResponse {
        account,
        cascaded_count,
    }))
}

/// Reactivate an account (never cascades)
#[utoipa::path(
    post,
    path = "/api/accounts/{id}/reactivate",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account reactivated", body = Account),
        (status = 403, description = "Actor has no authority over this account"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Account already active")
    ),
    tag = "Accounts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn reactivate_account(
    State(state): State<AppState>,
    RequireUsersUpdate(auth_user): RequireUsersUpdate,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let principal = auth_user.principal()?;
    let account = state
        .accounts
        .reactivate(&principal, AccountId::from_uuid(id))
        .await?;
    Ok(Json(account))
}
