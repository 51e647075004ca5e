/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Status used when a valid token lacks the endpoint's permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialPolicy {
    /// 403 for `PermissionDenied`, 401 for the rest.
    Forbidden,
    /// 401 for every authorization failure.
    Unauthorized,
}

impl DenialPolicy {
    fn parse(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw.map(str::trim) {
            None | Some("") | Some("403") => Ok(Self::Forbidden),
            Some("401") => Ok(Self::Unauthorized),
            Some(_) => Err(ConfigError::Invalid("AUTH_PERMISSION_DENIED_STATUS")),
        }
    }
}

/// Where the signing keys come from.
#[derive(Debug, Clone, PartialEq)]
pub enum JwksSetting {
    Remote(Url),
    /// Inline JWKS document, for running without an identity provider.
    Inline(serde_json::Value),
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub auth_algorithms: Vec<Algorithm>,
    pub auth_jwks: JwksSetting,
    pub auth_jwks_timeout: Duration,
    pub auth_jwks_min_refresh: Duration,
    pub access_token_leeway_seconds: u64,
    pub denial_policy: DenialPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(&var, "PORT", 5000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_issuer = var("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let auth_audience = var("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let auth_algorithms = parse_algorithms(var("AUTH_ALGORITHMS").as_deref().unwrap_or("RS256"))
            .ok_or(ConfigError::Invalid("AUTH_ALGORITHMS"))?;

        let auth_jwks = match (var("AUTH_JWKS_JSON"), var("AUTH_JWKS_URL")) {
            (Some(inline), _) => JwksSetting::Inline(
                serde_json::from_str(&inline).map_err(|_| ConfigError::Invalid("AUTH_JWKS_JSON"))?,
            ),
            (None, Some(url)) => JwksSetting::Remote(
                Url::parse(&url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
            ),
            (None, None) => JwksSetting::Remote(
                default_jwks_url(&auth_issuer).map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))?,
            ),
        };

        let auth_jwks_timeout =
            Duration::from_secs(parse_or(&var, "AUTH_JWKS_TIMEOUT_SECONDS", 5)?);

        // 0: every kid miss may refetch the key set
        let auth_jwks_min_refresh =
            Duration::from_secs(parse_or(&var, "AUTH_JWKS_MIN_REFRESH_SECONDS", 0)?);

        let access_token_leeway_seconds = parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let denial_policy = DenialPolicy::parse(var("AUTH_PERMISSION_DENIED_STATUS").as_deref())?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            auth_algorithms,
            auth_jwks,
            auth_jwks_timeout,
            auth_jwks_min_refresh,
            access_token_leeway_seconds,
            denial_policy,
        })
    }
}

/// `default` when unset, `Invalid(key)` when set but unparsable.
fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

/// Comma-separated algorithm names, e.g. `RS256,EdDSA`. `None` if any is unknown or the list is empty.
fn parse_algorithms(raw: &str) -> Option<Vec<Algorithm>> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).ok())
        .collect::<Option<Vec<_>>>()?;

    (!algorithms.is_empty()).then_some(algorithms)
}

/// `{issuer}/.well-known/jwks.json`, the standard OIDC location.
fn default_jwks_url(issuer: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(issuer)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(".well-known/jwks.json")
}
