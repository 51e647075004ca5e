use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

/// Verified token payload, kept exactly as decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.0.get("iss").and_then(Value::as_str)
    }

    /// `exp` as unix seconds. Fractional NumericDates are truncated.
    pub fn expires_at(&self) -> Option<i64> {
        let exp = self.0.get("exp")?;
        exp.as_i64().or_else(|| exp.as_f64().map(|f| f as i64))
    }

    /// The `permissions` claim as a set.
    ///
    /// `None` when the claim is absent or is not an array of strings
    /// (a scalar does not count as a set).
    pub fn permissions(&self) -> Option<BTreeSet<&str>> {
        match self.0.get("permissions")? {
            Value::Array(items) => items.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
