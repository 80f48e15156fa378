use sqlx::PgPool;

use sudstack_config::{CorsConfig, JwtConfig, RateLimitConfig};
use sudstack_core::TracingAuditSink;
use sudstack_db::init_db_pool;

use crate::modules::accounts::service::AccountService;
use crate::store::PgAccountStore;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub accounts: AccountService<PgAccountStore, TracingAuditSink>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
}

pub async fn init_app_state() -> AppState {
    let db = init_db_pool().await;
    let accounts = AccountService::new(PgAccountStore::new(db.clone()), TracingAuditSink);
    AppState {
        db,
        accounts,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
    }
}
