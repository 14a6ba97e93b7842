use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_KEY_LENGTH: usize = 512;
pub const MAX_PREFIX_LENGTH: usize = 64;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum KvError {
    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

/// A storage key under a validated namespace, rendered as `namespace:key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KvKey {
    namespace: String,
    key: String,
}

impl KvKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Result<Self, KvError> {
        let namespace = namespace.into();
        let key = key.into();
        Self::validate_namespace(&namespace)?;
        Self::validate_key(&key)?;
        Ok(Self { namespace, key })
    }

    pub fn raw(&self) -> String {
        format!("{}:{}", self.namespace, self.key)
    }

    fn validate_namespace(prefix: &str) -> Result<(), KvError> {
        if prefix.is_empty() {
            return Err(KvError::InvalidKey {
                key: prefix.to_string(),
                reason: "namespace cannot be empty".to_string(),
            });
        }
        if prefix.len() > MAX_PREFIX_LENGTH {
            return Err(KvError::InvalidKey {
                key: prefix.to_string(),
                reason: format!(
                    "namespace exceeds maximum length of {} bytes",
                    MAX_PREFIX_LENGTH
                ),
            });
        }
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(KvError::InvalidKey {
                key: prefix.to_string(),
                reason: "namespace contains invalid characters".to_string(),
            });
        }
        Ok(())
    }

    fn validate_key(key: &str) -> Result<(), KvError> {
        if key.trim().is_empty() {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key cannot be empty".to_string(),
            });
        }

        if key.len() > MAX_KEY_LENGTH {
            return Err(KvError::InvalidKey {
                key: key.chars().take(50).collect::<String>() + "...",
                reason: format!("key exceeds maximum length of {} bytes", MAX_KEY_LENGTH),
            });
        }

        if key.chars().any(|c| c.is_control() || c == ':') {
            return Err(KvError::InvalidKey {
                key: key.escape_default().to_string(),
                reason: "key contains separator or control characters".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for KvKey {
    fn default() -> Self {
        Self {
            namespace: crate::config::DEFAULT_STORAGE_NAMESPACE.to_string(),
            key: crate::config::DEFAULT_LAST_CATEGORY_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_key_joins_namespace() {
        let key = KvKey::new("settings", "last_category").unwrap();
        assert_eq!(key.raw(), "settings:last_category");
        assert_eq!(KvKey::default(), key);
    }

    #[test]
    fn rejects_invalid_parts() {
        assert!(KvKey::new("", "k").is_err());
        assert!(KvKey::new("has space", "k").is_err());
        assert!(KvKey::new("settings", "  ").is_err());
        assert!(KvKey::new("settings", "a:b").is_err());
        assert!(KvKey::new("settings", "line\nbreak").is_err());
        assert!(KvKey::new("settings", "x".repeat(MAX_KEY_LENGTH + 1)).is_err());
    }
}
