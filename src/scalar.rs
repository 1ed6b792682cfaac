//! Scalar kinds and their canonical text forms.
//!
//! Every value that can sit in a record field belongs to one of a fixed set of
//! [`ScalarKind`]s. [`ScalarCodec`] converts a [`ScalarValue`] to its text form
//! and parses text back into a value of a requested kind, using one fixed
//! pattern per kind.

use crate::encoding::TextEncoding;
use crate::error::CodecError;
use crate::lob::{Blob, Clob};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Pattern for full timestamps and calendar values (`yyyyMMddHHmmss`)
pub const TIMESTAMP_PATTERN: &str = "%Y%m%d%H%M%S";
/// Pattern for time-of-day values (`HHmmss`)
pub const TIME_PATTERN: &str = "%H%M%S";
/// Basic ISO calendar date (`yyyyMMdd`)
pub const DATE_PATTERN: &str = "%Y%m%d";

/// The closed set of value kinds a record field may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Text,
    CharSequence,
    Char,
    Int,
    Bytes,
    Float,
    Double,
    Long,
    Bool,
    Decimal,
    BigInteger,
    Timestamp,
    Time,
    Date,
    Byte,
    Short,
    Calendar,
    Clob,
    Blob,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 19] = [
        ScalarKind::Text,
        ScalarKind::CharSequence,
        ScalarKind::Char,
        ScalarKind::Int,
        ScalarKind::Bytes,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Long,
        ScalarKind::Bool,
        ScalarKind::Decimal,
        ScalarKind::BigInteger,
        ScalarKind::Timestamp,
        ScalarKind::Time,
        ScalarKind::Date,
        ScalarKind::Byte,
        ScalarKind::Short,
        ScalarKind::Calendar,
        ScalarKind::Clob,
        ScalarKind::Blob,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::CharSequence => "char_sequence",
            ScalarKind::Char => "char",
            ScalarKind::Int => "int",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Long => "long",
            ScalarKind::Bool => "bool",
            ScalarKind::Decimal => "decimal",
            ScalarKind::BigInteger => "big_integer",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Time => "time",
            ScalarKind::Date => "date",
            ScalarKind::Byte => "byte",
            ScalarKind::Short => "short",
            ScalarKind::Calendar => "calendar",
            ScalarKind::Clob => "clob",
            ScalarKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScalarKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CodecError::conversion("scalar kind", s, "unsupported scalar kind"))
    }
}

/// A value of one of the supported scalar kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    CharSequence(Arc<str>),
    Char(char),
    Int(i32),
    Bytes(Vec<u8>),
    Float(f32),
    Double(f64),
    Long(i64),
    Bool(bool),
    Decimal(BigDecimal),
    BigInteger(BigInt),
    Timestamp(NaiveDateTime),
    Time(NaiveTime),
    Date(NaiveDate),
    Byte(i8),
    Short(i16),
    Calendar(DateTime<Local>),
    Clob(Clob),
    Blob(Blob),
}

macro_rules! downcast_scalar {
    ($any:expr, $( $ty:ty => $variant:ident ),* $(,)?) => {
        $(
            if let Some(v) = $any.downcast_ref::<$ty>() {
                return Some(ScalarValue::$variant(v.clone()));
            }
        )*
    };
}

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Text(_) => ScalarKind::Text,
            ScalarValue::CharSequence(_) => ScalarKind::CharSequence,
            ScalarValue::Char(_) => ScalarKind::Char,
            ScalarValue::Int(_) => ScalarKind::Int,
            ScalarValue::Bytes(_) => ScalarKind::Bytes,
            ScalarValue::Float(_) => ScalarKind::Float,
            ScalarValue::Double(_) => ScalarKind::Double,
            ScalarValue::Long(_) => ScalarKind::Long,
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::Decimal(_) => ScalarKind::Decimal,
            ScalarValue::BigInteger(_) => ScalarKind::BigInteger,
            ScalarValue::Timestamp(_) => ScalarKind::Timestamp,
            ScalarValue::Time(_) => ScalarKind::Time,
            ScalarValue::Date(_) => ScalarKind::Date,
            ScalarValue::Byte(_) => ScalarKind::Byte,
            ScalarValue::Short(_) => ScalarKind::Short,
            ScalarValue::Calendar(_) => ScalarKind::Calendar,
            ScalarValue::Clob(_) => ScalarKind::Clob,
            ScalarValue::Blob(_) => ScalarKind::Blob,
        }
    }

    /// Wrap a dynamically typed value.
    ///
    /// The concrete type must be exactly one of the supported Rust types;
    /// wrappers and newtypes around them are not recognised.
    pub fn from_any(value: &dyn Any) -> Option<ScalarValue> {
        downcast_scalar!(value,
            String => Text,
            Arc<str> => CharSequence,
            char => Char,
            i32 => Int,
            Vec<u8> => Bytes,
            f32 => Float,
            f64 => Double,
            i64 => Long,
            bool => Bool,
            BigDecimal => Decimal,
            BigInt => BigInteger,
            NaiveDateTime => Timestamp,
            NaiveTime => Time,
            NaiveDate => Date,
            i8 => Byte,
            i16 => Short,
            DateTime<Local> => Calendar,
            Clob => Clob,
            Blob => Blob,
        );
        None
    }
}

/// Converts single scalar values to and from text.
///
/// The only state is the text encoding applied to byte-sequence kinds, so one
/// codec can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarCodec {
    encoding: TextEncoding,
}

impl ScalarCodec {
    pub fn new(encoding: TextEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Encode a value into its canonical text. `None` encodes to `""`.
    pub fn encode(&self, value: Option<&ScalarValue>) -> Result<String, CodecError> {
        let value = match value {
            Some(value) => value,
            None => return Ok(String::new()),
        };

        let text = match value {
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::CharSequence(s) => s.to_string(),
            ScalarValue::Char(c) => c.to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Bytes(b) => self.encoding.decode(b),
            ScalarValue::Float(f) => f.to_string(),
            ScalarValue::Double(d) => d.to_string(),
            ScalarValue::Long(l) => l.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Decimal(d) => d.to_string(),
            ScalarValue::BigInteger(i) => i.to_string(),
            ScalarValue::Timestamp(ts) => ts.format(TIMESTAMP_PATTERN).to_string(),
            ScalarValue::Time(t) => t.format(TIME_PATTERN).to_string(),
            ScalarValue::Date(d) => d.format(DATE_PATTERN).to_string(),
            ScalarValue::Byte(b) => b.to_string(),
            ScalarValue::Short(s) => s.to_string(),
            ScalarValue::Calendar(dt) => dt.format(TIMESTAMP_PATTERN).to_string(),
            ScalarValue::Clob(clob) => clob
                .drain_lines()
                .map_err(|e| CodecError::conversion(ScalarKind::Clob.name(), "<clob>", e.to_string()))?,
            ScalarValue::Blob(blob) => blob
                .drain_lines(self.encoding)
                .map_err(|e| CodecError::conversion(ScalarKind::Blob.name(), "<blob>", e.to_string()))?,
        };

        Ok(text)
    }

    /// Encode a dynamically typed value, rejecting unsupported types.
    pub fn encode_any<T: Any + fmt::Debug>(&self, value: Option<&T>) -> Result<String, CodecError> {
        let value = match value {
            Some(value) => value,
            None => return Ok(String::new()),
        };

        let scalar = ScalarValue::from_any(value).ok_or_else(|| {
            CodecError::conversion(
                std::any::type_name::<T>(),
                format!("{:?}", value),
                "type is not a supported scalar kind",
            )
        })?;

        self.encode(Some(&scalar))
    }

    /// Parse text into a value of `kind`. `None` or blank text decodes to `None`.
    pub fn decode(&self, text: Option<&str>, kind: ScalarKind) -> Result<Option<ScalarValue>, CodecError> {
        let text = match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Ok(None),
        };

        let value = match kind {
            ScalarKind::Text => ScalarValue::Text(text.to_string()),
            ScalarKind::CharSequence => ScalarValue::CharSequence(Arc::from(text)),
            ScalarKind::Char => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ScalarValue::Char(c),
                    _ => {
                        return Err(CodecError::conversion(
                            kind.name(),
                            text,
                            "expected exactly one character",
                        ))
                    }
                }
            }
            ScalarKind::Int => ScalarValue::Int(parse_trimmed(text, kind)?),
            ScalarKind::Bytes => ScalarValue::Bytes(self.encoding.encode(text)),
            ScalarKind::Float => ScalarValue::Float(parse_trimmed(text, kind)?),
            ScalarKind::Double => ScalarValue::Double(parse_trimmed(text, kind)?),
            ScalarKind::Long => ScalarValue::Long(parse_trimmed(text, kind)?),
            ScalarKind::Bool => ScalarValue::Bool(text.trim().eq_ignore_ascii_case("true")),
            ScalarKind::Decimal => ScalarValue::Decimal(parse_trimmed(text, kind)?),
            ScalarKind::BigInteger => ScalarValue::BigInteger(parse_trimmed(text, kind)?),
            ScalarKind::Timestamp => ScalarValue::Timestamp(parse_timestamp(text, kind)?),
            ScalarKind::Time => ScalarValue::Time(
                NaiveTime::parse_from_str(text, TIME_PATTERN)
                    .map_err(|e| CodecError::conversion(kind.name(), text, e.to_string()))?,
            ),
            ScalarKind::Date => ScalarValue::Date(
                NaiveDate::parse_from_str(text, DATE_PATTERN)
                    .map_err(|e| CodecError::conversion(kind.name(), text, e.to_string()))?,
            ),
            ScalarKind::Byte => ScalarValue::Byte(parse_trimmed(text, kind)?),
            ScalarKind::Short => ScalarValue::Short(parse_trimmed(text, kind)?),
            ScalarKind::Calendar => {
                let naive = parse_timestamp(text, kind)?;
                let local = Local.from_local_datetime(&naive).earliest().ok_or_else(|| {
                    CodecError::conversion(kind.name(), text, "local time does not exist")
                })?;
                ScalarValue::Calendar(local)
            }
            ScalarKind::Clob => ScalarValue::Clob(Clob::from(text)),
            ScalarKind::Blob => ScalarValue::Blob(Blob::from(self.encoding.encode(text))),
        };

        Ok(Some(value))
    }
}

fn parse_trimmed<T>(text: &str, kind: ScalarKind) -> Result<T, CodecError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| CodecError::conversion(kind.name(), text, e.to_string()))
}

fn parse_timestamp(text: &str, kind: ScalarKind) -> Result<NaiveDateTime, CodecError> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_PATTERN)
        .map_err(|e| CodecError::conversion(kind.name(), text, e.to_string()))
}

/// A Rust type that maps one-to-one onto a [`ScalarKind`].
pub trait Scalar: Sized {
    const KIND: ScalarKind;

    fn to_scalar(&self) -> ScalarValue;

    /// Unwrap a value of this kind, handing the value back on a kind mismatch.
    fn from_scalar(value: ScalarValue) -> Result<Self, ScalarValue>;
}

/// A bean field type: a scalar, or an optional scalar that may be null.
pub trait ScalarField: Sized {
    const KIND: ScalarKind;

    fn read_scalar(&self) -> Option<ScalarValue>;

    fn write_scalar(value: Option<ScalarValue>) -> Result<Self, String>;
}

fn kind_mismatch(expected: ScalarKind, actual: &ScalarValue) -> String {
    format!("expected {} value, got {}", expected, actual.kind())
}

// What a non-optional field receives when its value is null: text, bytes and
// large objects fall back to empty, every other kind refuses.
macro_rules! null_scalar {
    (empty, $ty:ty, $variant:ident) => {
        Ok(<$ty as Default>::default())
    };
    (reject, $ty:ty, $variant:ident) => {
        Err(format!("null is not allowed for a non-optional {} field", ScalarKind::$variant))
    };
}

macro_rules! impl_scalar {
    ($null:ident: $( $ty:ty => $variant:ident ),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn to_scalar(&self) -> ScalarValue {
                    ScalarValue::$variant(self.clone())
                }

                fn from_scalar(value: ScalarValue) -> Result<Self, ScalarValue> {
                    match value {
                        ScalarValue::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }

            impl ScalarField for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn read_scalar(&self) -> Option<ScalarValue> {
                    Some(self.to_scalar())
                }

                fn write_scalar(value: Option<ScalarValue>) -> Result<Self, String> {
                    match value {
                        Some(v) => <$ty as Scalar>::from_scalar(v)
                            .map_err(|v| kind_mismatch(ScalarKind::$variant, &v)),
                        None => null_scalar!($null, $ty, $variant),
                    }
                }
            }

            impl ScalarField for Option<$ty> {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn read_scalar(&self) -> Option<ScalarValue> {
                    self.as_ref().map(Scalar::to_scalar)
                }

                fn write_scalar(value: Option<ScalarValue>) -> Result<Self, String> {
                    value
                        .map(|v| <$ty as Scalar>::from_scalar(v)
                            .map_err(|v| kind_mismatch(ScalarKind::$variant, &v)))
                        .transpose()
                }
            }
        )*
    };
}

impl_scalar!(empty:
    String => Text,
    Arc<str> => CharSequence,
    Vec<u8> => Bytes,
    Clob => Clob,
    Blob => Blob,
);

impl_scalar!(reject:
    char => Char,
    i32 => Int,
    f32 => Float,
    f64 => Double,
    i64 => Long,
    bool => Bool,
    BigDecimal => Decimal,
    BigInt => BigInteger,
    NaiveDateTime => Timestamp,
    NaiveTime => Time,
    NaiveDate => Date,
    i8 => Byte,
    i16 => Short,
    DateTime<Local> => Calendar,
);
