use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::permissions::controller::{
    get_catalog, get_preset_by_key, get_presets, subset_preview,
};
use crate::state::AppState;

pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(get_catalog))
        .route("/presets", get(get_presets))
        .route("/presets/{key}", get(get_preset_by_key))
        .route("/subset-preview", post(subset_preview))
}
