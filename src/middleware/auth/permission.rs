/*
 * Responsibility
 * - endpoint ごとの permission を route_layer で掛ける
 * - Authorization ヘッダ → AuthGuard::authorize → 拒否 or Claims を extensions に格納
 * - 拒否は DenialPolicy に従い 401/403 (KeySet 障害は 500) に変換
 */
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::config::DenialPolicy;
use crate::error::AppError;
use crate::services::auth::{AuthError, AuthGuard};
use crate::state::AppState;

/// One endpoint's requirement, bound to the shared guard.
#[derive(Clone, Debug)]
pub struct PermissionGate {
    guard: Arc<AuthGuard>,
    policy: DenialPolicy,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(guard: Arc<AuthGuard>, policy: DenialPolicy, permission: &'static str) -> Self {
        Self {
            guard,
            policy,
            permission,
        }
    }

    pub fn from_state(state: &AppState, permission: &'static str) -> Self {
        Self::new(state.auth.clone(), state.denial_policy, permission)
    }
}

/// Wrap a method router so every method on it requires `gate`'s permission.
pub fn guarded<S>(route: MethodRouter<S>, gate: PermissionGate) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(gate, permission_middleware))
}

async fn permission_middleware(
    State(gate): State<PermissionGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credential = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(v) => Some(v.to_owned()),
            Err(_) => return Err(deny(&gate, req.uri().path(), AuthError::MalformedHeader)),
        },
    };

    let claims = match gate
        .guard
        .authorize(gate.permission, credential.as_deref())
        .await
    {
        Ok(claims) => claims,
        Err(err) => return Err(deny(&gate, req.uri().path(), err)),
    };

    tracing::debug!(
        sub = claims.subject().unwrap_or_default(),
        permission = gate.permission,
        "request authorized"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn deny(gate: &PermissionGate, path: &str, err: AuthError) -> AppError {
    if err.is_client_error() {
        tracing::warn!(
            error = %err,
            code = err.code(),
            permission = gate.permission,
            path,
            "request denied"
        );
    } else {
        tracing::error!(
            error = %err,
            permission = gate.permission,
            path,
            "authorization unavailable"
        );
    }
    AppError::from_auth(err, gate.policy)
}
