//! Codec construction settings.

use serde::{Deserialize, Serialize};

use crate::decoder::DEFAULT_MAX_DEPTH;
use crate::CodecError;

/// Default scratch capacity: 64 KiB.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Settings for [`crate::Codec::new`].
///
/// Deserializes from any serde format with every field optional:
///
/// ```
/// use dictpack::CodecConfig;
///
/// let config = CodecConfig::from_json(r#"{"capacity": 4096, "dictionary": ["id"]}"#).unwrap();
/// assert_eq!(config.capacity, 4096);
/// assert_eq!(config.max_depth, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Scratch buffer size in bytes; the largest encoding an instance can
    /// produce.
    pub capacity: usize,
    /// Maximum array/map nesting accepted by `decode`.
    pub max_depth: usize,
    /// Keys registered at construction. Non-empty enables dictionary mode.
    pub dictionary: Vec<String>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            dictionary: Vec::new(),
        }
    }
}

impl CodecConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_dictionary<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.dictionary = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.capacity == 0 {
            return Err(CodecError::Config(
                "capacity must be greater than zero".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(CodecError::Config(
                "max_depth must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
