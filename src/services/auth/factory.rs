/// Factory: build `AuthGuard` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, JwksSetting};
use crate::services::auth::key_set::{
    HttpKeySetSource, KeySetCache, KeySetError, KeySetSource, StaticKeySetSource,
};
use crate::services::auth::{AuthGuard, GuardConfig};

pub fn build_auth_guard(config: &Config) -> Result<Arc<AuthGuard>, KeySetError> {
    let source: Arc<dyn KeySetSource> = match &config.auth_jwks {
        JwksSetting::Remote(url) => {
            Arc::new(HttpKeySetSource::new(url.clone(), config.auth_jwks_timeout)?)
        }
        JwksSetting::Inline(document) => Arc::new(StaticKeySetSource::new(document.clone())),
    };

    let keys = KeySetCache::new(source, config.auth_jwks_min_refresh);

    let guard = AuthGuard::new(
        GuardConfig {
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            algorithms: config.auth_algorithms.clone(),
            leeway_seconds: config.access_token_leeway_seconds,
        },
        Arc::new(keys),
    );

    Ok(Arc::new(guard))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use httpmock::prelude::*;

    use super::*;
    use crate::services::auth::test_support::{AUDIENCE, ISSUER, TestIssuer, valid_claims};

    fn config_for(jwks_url: &str) -> Config {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("AUTH_ISSUER", ISSUER),
            ("AUTH_AUDIENCE", AUDIENCE),
            ("AUTH_ALGORITHMS", "EdDSA"),
            ("AUTH_JWKS_URL", jwks_url),
        ]);
        Config::from_lookup(|key: &str| env.get(key).map(|v| v.to_string())).expect("config")
    }

    #[tokio::test]
    async fn default_config_refetches_keys_once_after_rotation() {
        let server = MockServer::start_async().await;
        let old = TestIssuer::new("k1", 1);
        let new = TestIssuer::new("k2", 2);

        let mut before = server
            .mock_async(|when, then| {
                when.method(GET).path("/jwks");
                then.status(200).json_body(old.jwks());
            })
            .await;

        let config = config_for(&server.url("/jwks"));
        assert_eq!(config.auth_jwks_min_refresh, Duration::ZERO);
        let guard = build_auth_guard(&config).expect("guard");

        let token = old.sign(&valid_claims(&["get:drink-detail"]));
        guard
            .authorize("get:drink-detail", Some(&format!("Bearer {token}")))
            .await
            .expect("k1 token");
        before.assert_hits_async(1).await;

        // Issuer rotates: k2 published alongside k1
        before.delete_async().await;
        let mut rotated = old.jwks();
        rotated["keys"]
            .as_array_mut()
            .unwrap()
            .extend(new.jwks()["keys"].as_array().unwrap().iter().cloned());
        let after = server
            .mock_async(|when, then| {
                when.method(GET).path("/jwks");
                then.status(200).json_body(rotated);
            })
            .await;

        let token = new.sign(&valid_claims(&["get:drink-detail"]));
        let claims = guard
            .authorize("get:drink-detail", Some(&format!("Bearer {token}")))
            .await
            .expect("k2 token after refresh");
        assert_eq!(claims.subject(), Some("auth0|barista"));
        after.assert_hits_async(1).await;
    }

    #[test]
    fn inline_jwks_needs_no_network() {
        let issuer = TestIssuer::new("dev", 4);
        let jwks = issuer.jwks().to_string();
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("AUTH_ISSUER", ISSUER),
            ("AUTH_AUDIENCE", AUDIENCE),
            ("AUTH_JWKS_JSON", jwks.as_str()),
        ]);
        let config =
            Config::from_lookup(|key: &str| env.get(key).map(|v| v.to_string())).expect("config");

        let guard = build_auth_guard(&config).expect("guard");
        assert_eq!(guard.keys().describe(), "static JWKS");
    }
}
