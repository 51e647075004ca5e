//! Ed25519 token issuer for tests. Deterministic keys from a one-byte seed.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ed25519_dalek::pkcs8::{EncodePrivateKey, spki::der::pem::LineEnding};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

pub const ISSUER: &str = "https://issuer/";
pub const AUDIENCE: &str = "api";

pub struct TestIssuer {
    kid: String,
    signing_key: ed25519_dalek::SigningKey,
    encoding_key: EncodingKey,
}

impl TestIssuer {
    pub fn new(kid: &str, seed: u8) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&[seed; 32]);
        let pem = signing_key
            .to_pkcs8_pem(LineEnding::LF)
            .expect("pkcs8 pem");
        let encoding_key = EncodingKey::from_ed_pem(pem.as_bytes()).expect("encoding key");

        Self {
            kid: kid.to_string(),
            signing_key,
            encoding_key,
        }
    }

    pub fn public_x(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.signing_key.verifying_key().as_bytes())
    }

    pub fn jwks(&self) -> Value {
        json!({
            "keys": [{
                "kty": "OKP",
                "crv": "Ed25519",
                "use": "sig",
                "alg": "EdDSA",
                "kid": self.kid,
                "x": self.public_x(),
            }]
        })
    }

    pub fn sign(&self, claims: &Value) -> String {
        self.sign_as(&self.kid, claims)
    }

    /// Sign with this key but advertise another `kid`.
    pub fn sign_as(&self, kid: &str, claims: &Value) -> String {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(kid.to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).expect("sign")
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims that pass every check, carrying `permissions`.
pub fn valid_claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "aud": AUDIENCE,
        "sub": "auth0|barista",
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// Guard trusting only `issuer`'s key, EdDSA, no leeway.
pub fn guard_for(issuer: &TestIssuer) -> crate::services::auth::AuthGuard {
    use std::{sync::Arc, time::Duration};

    use crate::services::auth::key_set::{KeySetCache, StaticKeySetSource};
    use crate::services::auth::{AuthGuard, GuardConfig};

    let keys = KeySetCache::new(
        Arc::new(StaticKeySetSource::new(issuer.jwks())),
        Duration::ZERO,
    );
    AuthGuard::new(
        GuardConfig {
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
            algorithms: vec![Algorithm::EdDSA],
            leeway_seconds: 0,
        },
        Arc::new(keys),
    )
}
