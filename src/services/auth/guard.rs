use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation};
use serde_json::{Map, Value};

use super::bearer::{self, TokenHeader};
use super::claims::Claims;
use super::error::AuthError;
use super::key_set::{KeySetCache, SigningKey};

/// What a valid token must look like.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    pub issuer: String,
    pub audience: String,
    /// Algorithms accepted in the token header.
    pub algorithms: Vec<Algorithm>,
    /// Clock skew tolerated on `exp`. 0 means `exp` must be strictly in the future.
    pub leeway_seconds: u64,
}

/// Bearer-token guard: `Bearer <jwt>` + required permission -> verified claims.
///
/// Pipeline: extract -> decode header -> resolve key -> verify -> permission.
/// The first failing step decides the error; nothing is retried.
#[derive(Debug)]
pub struct AuthGuard {
    config: GuardConfig,
    keys: Arc<KeySetCache>,
}

impl AuthGuard {
    pub fn new(config: GuardConfig, keys: Arc<KeySetCache>) -> Self {
        Self { config, keys }
    }

    pub fn keys(&self) -> &KeySetCache {
        &self.keys
    }

    /// Authorize one request.
    ///
    /// - `required_permission`: fixed per endpoint; empty means "any valid token".
    /// - `credential`: the raw `Authorization` header value, `None` if absent.
    pub async fn authorize(
        &self,
        required_permission: &str,
        credential: Option<&str>,
    ) -> Result<Claims, AuthError> {
        let token = bearer::extract_token(credential)?;
        let header = bearer::decode_header(token)?;
        let key = self.keys.resolve(&header.kid).await?;
        let claims = self.verify(token, &header, &key)?;

        if !required_permission.is_empty() {
            check_permission(&claims, required_permission)?;
        }

        Ok(claims)
    }

    /// Signature, issuer, audience and expiry.
    fn verify(
        &self,
        token: &str,
        header: &TokenHeader,
        key: &SigningKey,
    ) -> Result<Claims, AuthError> {
        if !self.config.algorithms.contains(&header.alg) {
            return Err(AuthError::SignatureInvalid(format!(
                "algorithm {:?} is not allowed",
                header.alg
            )));
        }
        if let Some(expected) = key.algorithm
            && expected != header.alg
        {
            return Err(AuthError::SignatureInvalid(format!(
                "algorithm {:?} does not match signing key ({:?})",
                header.alg, expected
            )));
        }

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // `exp` is checked below: strictly-in-the-future, which jsonwebtoken does not do.
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<Map<String, Value>>(token, &key.key, &validation)?;
        let claims = Claims::from(data.claims);

        let exp = claims
            .expires_at()
            .ok_or_else(|| AuthError::ClaimsInvalid("'exp' must be a numeric date".to_string()))?;
        let now = chrono::Utc::now().timestamp();
        let leeway = i64::try_from(self.config.leeway_seconds).unwrap_or(i64::MAX);
        if exp.saturating_add(leeway) <= now {
            return Err(AuthError::CredentialExpired);
        }

        if claims.subject().is_none_or(|s| s.trim().is_empty()) {
            return Err(AuthError::ClaimsInvalid("'sub' must be a non-empty string".to_string()));
        }

        Ok(claims)
    }
}

/// Permission enforcement on already verified claims.
pub fn check_permission(claims: &Claims, required: &str) -> Result<(), AuthError> {
    let granted = claims
        .permissions()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    if granted.contains(required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied(required.to_string()))
    }
}
