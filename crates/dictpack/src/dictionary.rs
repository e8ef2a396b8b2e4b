//! Key dictionary: registered map keys travel as small integers.

use std::collections::{HashMap, HashSet};

use crate::CodecError;

/// Counter value before the first registration. Each registration
/// increments first, so aliases run -32, -31, ... through the negative
/// fixint range and on into the positive fixint range: the first 160 keys
/// encode in a single byte.
pub const ALIAS_OFFSET: i64 = -33;

/// First alias handed out.
pub const FIRST_ALIAS: i64 = ALIAS_OFFSET + 1;

/// Bidirectional alias table plus the one-way "dictionary mode" switch.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    enabled: bool,
    /// `keys[i]` has alias `FIRST_ALIAS + i`.
    keys: Vec<String>,
    aliases: HashMap<String, i64>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether maps pass their keys through the table. Becomes `true` on the
    /// first [`register`](Self::register) call and never reverts.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Assigns the next sequential aliases to `keys`.
    ///
    /// The call is atomic: if any key is already registered, or appears
    /// twice in `keys`, nothing is registered and
    /// [`CodecError::DuplicateKey`] is returned. Dictionary mode is switched
    /// on even when `keys` is empty.
    pub fn register<I, K>(&mut self, keys: I) -> Result<(), CodecError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(keys.len());
        for key in &keys {
            if self.aliases.contains_key(key) || !seen.insert(key.as_str()) {
                return Err(CodecError::DuplicateKey(key.clone()));
            }
        }
        self.enabled = true;
        for key in keys {
            let alias = FIRST_ALIAS + self.keys.len() as i64;
            tracing::debug!(alias, key = %key, "registered dictionary key");
            self.aliases.insert(key.clone(), alias);
            self.keys.push(key);
        }
        Ok(())
    }

    /// Alias assigned to `key`, if registered.
    #[inline]
    pub fn alias_for(&self, key: &str) -> Option<i64> {
        self.aliases.get(key).copied()
    }

    /// Key registered under `alias`, if any.
    #[inline]
    pub fn key_for(&self, alias: i64) -> Option<&str> {
        let index = alias.checked_sub(FIRST_ALIAS)?;
        let index = usize::try_from(index).ok()?;
        self.keys.get(index).map(String::as_str)
    }

    /// `(alias, key)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.keys
            .iter()
            .enumerate()
            .map(|(i, k)| (FIRST_ALIAS + i as i64, k.as_str()))
    }
}
