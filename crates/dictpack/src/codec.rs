//! `Codec`: one isolated encode/decode/register context.

use std::fmt;

use dictpack_buffers::ScratchBuffer;
use serde::Serialize;

use crate::{to_value, CodecConfig, CodecError, Decoder, Dictionary, Encoder, Value};

const UNITS: [&str; 9] = ["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Human-readable byte count in decimal units with three significant digits
/// (`65536` → `"65.5 kB"`).
fn pretty_bytes(bytes: usize) -> String {
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut exponent = 0;
    while value >= 1000.0 && exponent < UNITS.len() - 1 {
        value /= 1000.0;
        exponent += 1;
    }
    let decimals = if value >= 100.0 {
        0
    } else if value >= 10.0 {
        1
    } else {
        2
    };
    let formatted = format!("{value:.decimals$}");
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    format!("{trimmed} {}", UNITS[exponent])
}

/// Creates a codec whose scratch buffer holds `capacity` bytes.
///
/// `logger`, when given, is called exactly once with a summary of the
/// configured limit and is not retained.
///
/// ```
/// use std::cell::RefCell;
///
/// let messages = RefCell::new(Vec::new());
/// let log = |m: &str| messages.borrow_mut().push(m.to_owned());
/// let codec = dictpack::initialize(1 << 30, Some(&log)).unwrap();
/// assert_eq!(codec.capacity(), 1 << 30);
/// assert_eq!(messages.borrow()[0], "@initialize : setting buffer limit to 1.07 GB");
/// ```
pub fn initialize(capacity: usize, logger: Option<&dyn Fn(&str)>) -> Result<Codec, CodecError> {
    Codec::with_logger(CodecConfig::new(capacity), logger)
}

/// Owns a scratch buffer and a dictionary; encodes and decodes [`Value`]s.
///
/// `encode`, `register` and `reallocate` take `&mut self`: one instance
/// serves one caller at a time. Use one instance per thread, or guard a
/// shared one with a mutex.
pub struct Codec {
    config: CodecConfig,
    scratch: ScratchBuffer,
    dictionary: Dictionary,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("config", &self.config)
            .field("dictionary", &self.dictionary)
            .finish_non_exhaustive()
    }
}

impl Codec {
    pub fn new(config: CodecConfig) -> Result<Self, CodecError> {
        Self::with_logger(config, None)
    }

    pub fn with_logger(
        config: CodecConfig,
        logger: Option<&dyn Fn(&str)>,
    ) -> Result<Self, CodecError> {
        config.validate()?;
        let mut dictionary = Dictionary::new();
        if !config.dictionary.is_empty() {
            dictionary.register(config.dictionary.iter().cloned())?;
        }
        if let Some(log) = logger {
            log(&format!(
                "@initialize : setting buffer limit to {}",
                pretty_bytes(config.capacity)
            ));
        }
        tracing::debug!(
            capacity = config.capacity,
            max_depth = config.max_depth,
            dictionary_keys = dictionary.len(),
            "codec initialized"
        );
        Ok(Self {
            scratch: ScratchBuffer::with_capacity(config.capacity),
            dictionary,
            config,
        })
    }

    /// Settings the instance was built with; `capacity` follows
    /// [`reallocate`](Self::reallocate).
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.scratch.capacity()
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Serializes `value`. The result is a fresh copy; the scratch buffer
    /// stays private to the instance.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let result = Encoder::new(&mut self.scratch, &self.dictionary).encode(value);
        match &result {
            Ok(bytes) => tracing::trace!(len = bytes.len(), "encoded value"),
            Err(CodecError::EncodeOverflow {
                offset,
                requested,
                capacity,
            }) => tracing::warn!(
                offset,
                requested,
                capacity,
                "encode overflowed the scratch buffer"
            ),
            Err(_) => {}
        }
        result
    }

    /// Converts any `Serialize` type with [`to_value`] and encodes it.
    pub fn encode_serialize<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<Vec<u8>, CodecError> {
        let value = to_value(value)?;
        self.encode(&value)
    }

    /// Parses the root value at the start of `input`; trailing bytes are
    /// ignored.
    pub fn decode(&self, input: &[u8]) -> Result<Value, CodecError> {
        self.decode_with_len(input).map(|(value, _)| value)
    }

    /// Like [`decode`](Self::decode), also returning the number of bytes the
    /// root value occupied.
    pub fn decode_with_len(&self, input: &[u8]) -> Result<(Value, usize), CodecError> {
        let (value, len) = Decoder::new(&self.dictionary)
            .with_max_depth(self.config.max_depth)
            .decode_with_len(input)?;
        tracing::trace!(len, input_len = input.len(), "decoded value");
        Ok((value, len))
    }

    /// Registers dictionary keys and switches dictionary mode on for good.
    /// See [`Dictionary::register`].
    pub fn register<I, K>(&mut self, keys: I) -> Result<(), CodecError>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.dictionary.register(keys)
    }

    /// Replaces the scratch buffer with a fresh one of `capacity` bytes.
    pub fn reallocate(&mut self, capacity: usize) -> Result<(), CodecError> {
        if capacity == 0 {
            return Err(CodecError::Config(
                "capacity must be greater than zero".into(),
            ));
        }
        tracing::debug!(
            from = self.scratch.capacity(),
            to = capacity,
            "reallocating scratch buffer"
        );
        self.scratch.reallocate(capacity);
        self.config.capacity = capacity;
        Ok(())
    }
}
