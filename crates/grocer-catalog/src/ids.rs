//! Product identifiers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable unique identifier of a product.
///
/// Base-catalog ids come from the bundled data (`"1"`, `"2"`, ...). Ids for
/// locally added products are derived from the current time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Seed data sometimes carries numeric ids; both forms are accepted.
impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Number(n) => Self(n.to_string()),
        })
    }
}

impl ProductId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate an id from the current timestamp.
    pub fn generate() -> Self {
        Self(generate_id().to_string())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Milliseconds since the epoch, bumped past the last value handed out so two
/// ids generated within the same millisecond still differ.
fn generate_id() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static LAST: AtomicU64 = AtomicU64::new(0);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut last = LAST.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(observed) => last = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("42");
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_id_generation_is_numeric_and_increasing() {
        let id1 = ProductId::generate();
        let id2 = ProductId::generate();

        let a: u64 = id1.as_str().parse().unwrap();
        let b: u64 = id2.as_str().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""7""#);

        let back: ProductId = serde_json::from_str(r#""7""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_accepts_numeric_json() {
        let id: ProductId = serde_json::from_str("12").unwrap();
        assert_eq!(id.as_str(), "12");
    }

    #[test]
    fn test_id_display() {
        let id = ProductId::new("prod-789");
        assert_eq!(format!("{}", id), "prod-789");
    }
}
