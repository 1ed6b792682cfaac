//! # Flatbean: Schema-less Bean Record Codec
//!
//! Flatbean turns plain data-holder structs ("beans") into flat, delimited
//! text records and back, driven by a field descriptor table per type rather
//! than a compiled schema.
//!
//! ## Features
//!
//! - **Scalar codec**: 19 scalar kinds (text, numbers, big numbers, dates and
//!   times, large objects), each with one canonical text form
//! - **Structural codec**: `Name=value` pairs joined by a separator, with a
//!   line-per-element block for list-of-bean fields
//! - **Bean shape guard**: types declaring anything other than getters and
//!   setters are refused
//! - **Configurable grammar**: separator, associator, line break and byte
//!   encoding, loadable from YAML or the environment
//!
//! ## Example
//!
//! ```
//! use flatbean::{bean_schema, Bean, BeanSchema, CodecConfig, RecordCodec};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Inner {
//!     x: i32,
//! }
//!
//! impl Bean for Inner {
//!     fn schema() -> &'static BeanSchema<Self> {
//!         bean_schema!(Inner, |schema| schema.scalar("x", |i| &i.x, |i, v| i.x = v))
//!     }
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Batch {
//!     items: Vec<Inner>,
//! }
//!
//! impl Bean for Batch {
//!     fn schema() -> &'static BeanSchema<Self> {
//!         bean_schema!(Batch, |schema| schema.list("items", |b| &b.items, |b, v| b.items = v))
//!     }
//! }
//!
//! let codec = RecordCodec::new(CodecConfig::default());
//! let batch = Batch { items: vec![Inner { x: 1 }, Inner { x: 2 }] };
//!
//! let text = codec.encode(&batch).unwrap();
//! assert_eq!(text, "Items=\nX=1\r\nX=2\r\n");
//! assert_eq!(codec.decode::<Batch>(&text).unwrap(), Some(batch));
//! ```
//!
//! ## Limitations
//!
//! The separator and associator are never escaped, so values containing them
//! do not round trip. Large objects are read fully into memory, and their line
//! breaks are dropped on encode.

// Core modules
#[macro_use]
pub mod bean;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod lob;
pub mod record;
pub mod scalar;
pub mod serialization;
pub mod shape;

// Re-export key types
pub use bean::{Bean, BeanSchema, BeanSchemaBuilder, FieldDescriptor, FieldType};
pub use codec::RecordCodec;
pub use config::CodecConfig;
pub use encoding::TextEncoding;
pub use error::{CodecError, ConfigError, ErrorKind};
pub use lob::{Blob, Clob};
pub use record::RawRecord;
pub use scalar::{Scalar, ScalarCodec, ScalarField, ScalarKind, ScalarValue};
pub use serialization::{RecordWriter, SerializationError};
pub use shape::is_bean_shape;

// Value types used by the big-number scalar kinds
pub use bigdecimal::num_bigint::BigInt;
pub use bigdecimal::BigDecimal;
