use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::accounts::controller::{
    create_admin, create_center_admin, create_staff, deactivate_account, get_account,
    list_accounts, list_created_accounts, reactivate_account, update_permissions,
};
use crate::state::AppState;

pub fn init_accounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/admins", post(create_admin))
        .route("/center-admins", post(create_center_admin))
        .route("/staff", post(create_staff))
        .route("/{id}", get(get_account))
        .route("/{id}/created", get(list_created_accounts))
        .route("/{id}/permissions", put(update_permissions))
        .route("/{id}/deactivate", post(deactivate_account))
        .route("/{id}/reactivate", post(reactivate_account))
}
