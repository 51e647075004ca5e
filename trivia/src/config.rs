/*
 * Responsibility
 * - 環境変数の読み込み (TRIVIA_PORT, DATABASE_URL)
 * - 不足なら起動失敗
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

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

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("TRIVIA_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("TRIVIA_PORT"))?,
            None => 5001,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("TRIVIA_PORT"))?;

        let database_url = var("TRIVIA_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Config { addr, database_url })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_port_5001() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/trivia")])).unwrap();
        assert_eq!(config.addr.port(), 5001);
        assert_eq!(config.database_url, "postgres://db/trivia");
    }

    #[test]
    fn trivia_database_url_wins() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/coffee"),
            ("TRIVIA_DATABASE_URL", "postgres://db/trivia"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "postgres://db/trivia");
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn bad_port_is_invalid() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://db/trivia"),
            ("TRIVIA_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("TRIVIA_PORT")));
    }
}
