//! Pair-level view of the record grammar.
//!
//! ```text
//! record      := pair (SEP pair)*
//! pair        := fieldName ASSOC value
//! ```
//!
//! Neither character is escaped: a value that contains the separator or the
//! associator cannot be represented.

use crate::config::CodecConfig;
use crate::error::CodecError;
use indexmap::IndexMap;
use serde::Serialize;

/// Split record text into `(key, raw value)` pairs.
///
/// Trailing empty chunks (a record ending in separators) are ignored. A chunk
/// without an associator, or starting with one, is rejected. An associator in
/// the last position yields an empty value.
pub(crate) fn split_pairs(
    text: &str,
    separator: char,
    associator: char,
) -> Result<Vec<(&str, &str)>, CodecError> {
    let mut chunks: Vec<&str> = text.split(separator).collect();
    while chunks.last() == Some(&"") {
        chunks.pop();
    }

    chunks
        .into_iter()
        .map(|chunk| split_pair(chunk, associator))
        .collect()
}

fn split_pair(chunk: &str, associator: char) -> Result<(&str, &str), CodecError> {
    match chunk.find(associator) {
        None => Err(CodecError::format(chunk, format!("missing associator '{}'", associator))),
        Some(0) => Err(CodecError::format(chunk, "missing field name before associator")),
        Some(idx) => Ok((&chunk[..idx], &chunk[idx + associator.len_utf8()..])),
    }
}

/// Record text parsed into ordered key/value pairs without a target type.
///
/// Keys are kept exactly as written. Empty values are `None`. When a key
/// repeats, the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawRecord {
    pairs: IndexMap<String, Option<String>>,
}

impl RawRecord {
    /// Parse one record using the grammar characters of `config`.
    ///
    /// # Example
    /// ```
    /// use flatbean::{CodecConfig, RawRecord};
    ///
    /// let record = RawRecord::parse("Str=hi|In=5|Note=", &CodecConfig::default()).unwrap();
    /// assert_eq!(record.get("In"), Some("5"));
    /// assert_eq!(record.get("Note"), None);
    /// assert!(record.contains_key("Note"));
    /// ```
    pub fn parse(text: &str, config: &CodecConfig) -> Result<Self, CodecError> {
        let mut pairs = IndexMap::new();
        if text.trim().is_empty() {
            return Ok(Self { pairs });
        }

        for (key, value) in split_pairs(text, config.separator, config.associator)? {
            let value = (!value.is_empty()).then(|| value.to_string());
            pairs.insert(key.to_string(), value);
        }

        Ok(Self { pairs })
    }

    /// Raw value for `key`; `None` when absent or empty
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
