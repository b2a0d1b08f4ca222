use sqlx::SqlitePool;

use bookstall_authz::{PasswordHasher, TokenIssuer};
use bookstall_kernel::InitCtx;

/// Shared handler state: the database pool and credential helpers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: TokenIssuer,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn from_ctx(ctx: &InitCtx<'_>) -> Self {
        Self {
            db: ctx.db.clone(),
            tokens: TokenIssuer::from_settings(&ctx.settings.auth),
            passwords: PasswordHasher::from_settings(&ctx.settings.auth),
        }
    }
}
