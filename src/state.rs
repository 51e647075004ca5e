/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, auth: AuthGuard (JWKS キャッシュ込み), 401/403 の方針
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::config::DenialPolicy;
use crate::services::auth::AuthGuard;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthGuard>,
    pub denial_policy: DenialPolicy,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<AuthGuard>, denial_policy: DenialPolicy) -> Self {
        Self {
            db,
            auth,
            denial_policy,
        }
    }
}
