//! Text encodings used to turn byte-sequence values into record text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Character set applied to `Bytes` and `Blob` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "UTF-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "iso-8859-1", alias = "ISO-8859-1", alias = "latin1")]
    Iso8859_1,
    #[serde(rename = "us-ascii", alias = "US-ASCII", alias = "ascii")]
    UsAscii,
}

impl TextEncoding {
    /// Canonical charset name
    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Iso8859_1 => "iso-8859-1",
            TextEncoding::UsAscii => "us-ascii",
        }
    }

    /// Decode bytes into text.
    ///
    /// Malformed or unmappable input is replaced with U+FFFD rather than rejected.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        }
    }

    /// Encode text into bytes. Characters outside the charset become `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Iso8859_1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            TextEncoding::UsAscii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" => Ok(TextEncoding::Iso8859_1),
            "us-ascii" | "ascii" => Ok(TextEncoding::UsAscii),
            other => Err(format!(
                "Unsupported text encoding: '{}'. Supported encodings: utf-8, iso-8859-1, us-ascii",
                other
            )),
        }
    }
}
