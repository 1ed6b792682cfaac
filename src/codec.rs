//! Structural codec: whole beans to and from record text.
//!
//! Scalar fields are delegated to [`ScalarCodec`]. A list field is written as
//! a block of sub-records, one per line, produced by encoding each element
//! with this same codec. On the way back, a bean whose only field is a list
//! is read line by line; every other bean is read pair by pair.

use crate::bean::{decapitalize, Bean, BeanSchema, FieldAccess};
use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::record::split_pairs;
use crate::scalar::ScalarCodec;

/// Encodes and decodes beans as flat delimited text.
///
/// Holds only immutable configuration and is safe to share between threads.
///
/// # Example
///
/// ```
/// use flatbean::{bean_schema, Bean, BeanSchema, RecordCodec};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Greeting {
///     str: Option<String>,
///     r#in: i32,
/// }
///
/// impl Bean for Greeting {
///     fn schema() -> &'static BeanSchema<Self> {
///         bean_schema!(Greeting, |schema| schema
///             .scalar("str", |g| &g.str, |g, v| g.str = v)
///             .scalar("in", |g| &g.r#in, |g, v| g.r#in = v))
///     }
/// }
///
/// let codec = RecordCodec::default();
/// let greeting = Greeting { str: Some("hi".to_string()), r#in: 5 };
///
/// let text = codec.encode(&greeting).unwrap();
/// assert_eq!(text, "Str=hi|In=5");
/// assert_eq!(codec.decode::<Greeting>(&text).unwrap(), Some(greeting));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordCodec {
    config: CodecConfig,
    scalars: ScalarCodec,
}

impl RecordCodec {
    /// Create a codec from a configuration.
    ///
    /// The configuration is taken as-is; use [`CodecConfig::validate`] first
    /// when it comes from an untrusted source.
    pub fn new(config: CodecConfig) -> Self {
        let scalars = ScalarCodec::new(config.encoding);
        Self { config, scalars }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn scalars(&self) -> &ScalarCodec {
        &self.scalars
    }

    /// Encode a bean into record text.
    ///
    /// Fields are written in schema order as `Name=value`, joined by the
    /// separator. A list field is followed by a line break and one
    /// sub-record per element, each terminated by the configured line break.
    ///
    /// # Errors
    /// * [`CodecError::InvalidShape`] if the type is not a bean
    /// * any error raised while encoding a field value, unchanged
    pub fn encode<B: Bean>(&self, bean: &B) -> Result<String, CodecError> {
        let schema = B::schema();
        check_shape(schema)?;

        tracing::trace!(bean = schema.type_name(), fields = schema.len(), "encoding bean");

        let mut out = String::new();
        let last = schema.len().saturating_sub(1);

        for (idx, field) in schema.fields().enumerate() {
            out.push_str(&field.wire_name());
            out.push(self.config.associator);

            match field.access() {
                FieldAccess::List(slot) => {
                    let records = slot.encode_elements(bean, self)?;
                    tracing::trace!(field = field.name(), elements = records.len(), "encoded list block");

                    out.push('\n');
                    for record in records {
                        out.push_str(&record);
                        out.push_str(&self.config.line_break);
                    }
                }
                FieldAccess::Scalar(slot) => {
                    let value = slot.get(bean);
                    out.push_str(&self.scalars.encode(value.as_ref())?);
                }
            }

            if idx < last {
                out.push(self.config.separator);
            }
        }

        Ok(out)
    }

    /// Decode record text into a fresh bean.
    ///
    /// Blank text yields `Ok(None)`. Fields are matched by name, so the order
    /// of pairs does not matter; fields absent from the text keep their
    /// default value.
    ///
    /// A failed decode does not roll back fields already set, but the
    /// partially built instance is never returned.
    ///
    /// # Errors
    /// * [`CodecError::InvalidShape`] if the type is not a bean
    /// * [`CodecError::Format`] for a chunk that is not a `name=value` pair
    /// * [`CodecError::ReflectiveAccess`] for an unknown field or a setter
    ///   that rejects the value
    /// * [`CodecError::Conversion`] for unparsable values
    pub fn decode<B: Bean>(&self, text: &str) -> Result<Option<B>, CodecError> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let schema = B::schema();
        check_shape(schema)?;

        let mut bean = B::default();

        if let Some(field) = schema.list_field() {
            if let FieldAccess::List(slot) = field.access() {
                let block = match text.find(self.config.associator) {
                    Some(idx) => &text[idx + self.config.associator.len_utf8()..],
                    None => "",
                };
                let lines: Vec<&str> = block.lines().collect();
                let count = slot.decode_elements(&mut bean, &lines, self)?;

                tracing::trace!(bean = schema.type_name(), field = field.name(), elements = count, "decoded list block");
                return Ok(Some(bean));
            }
        }

        let pairs = split_pairs(text, self.config.separator, self.config.associator)?;
        tracing::trace!(bean = schema.type_name(), pairs = pairs.len(), "decoding record");

        for (key, raw) in pairs {
            let name = decapitalize(key);
            let field = schema.field(&name).ok_or_else(|| {
                CodecError::reflective_access(schema.type_name(), format!("set_{}", name), "no such field")
            })?;

            match field.access() {
                FieldAccess::Scalar(slot) => {
                    let value = self.scalars.decode(Some(raw), slot.kind())?;
                    slot.set(&mut bean, value).map_err(|reason| {
                        CodecError::reflective_access(schema.type_name(), format!("set_{}", name), reason)
                    })?;
                }
                FieldAccess::List(_) => {
                    return Err(CodecError::conversion(
                        field.field_type().to_string(),
                        raw,
                        "list fields can only be decoded when they are the only field of the type",
                    ));
                }
            }
        }

        Ok(Some(bean))
    }
}

fn check_shape<B: 'static>(schema: &BeanSchema<B>) -> Result<(), CodecError> {
    if schema.is_bean_shape() {
        return Ok(());
    }

    Err(CodecError::InvalidShape {
        type_name: schema.type_name().to_string(),
        offending: crate::shape::non_accessor_methods(schema.methods())
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
