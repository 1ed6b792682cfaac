//! Bean trait and per-type field descriptor tables.
//!
//! A bean is a plain data holder: a struct with a [`Default`] value whose
//! fields are read and written through accessors. Instead of discovering
//! accessors by name at run time, every bean type publishes a [`BeanSchema`]
//! built once and cached for the life of the program.

use crate::codec::RecordCodec;
use crate::error::CodecError;
use crate::scalar::{ScalarField, ScalarKind, ScalarValue};
use indexmap::IndexMap;
use std::fmt;

/// Core trait for all types that can be encoded as flat records.
///
/// # Example
///
/// ```
/// use flatbean::{bean_schema, Bean, BeanSchema};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     label: Option<String>,
/// }
///
/// impl Bean for Point {
///     fn schema() -> &'static BeanSchema<Self> {
///         bean_schema!(Point, |schema| schema
///             .scalar("x", |p| &p.x, |p, v| p.x = v)
///             .scalar("label", |p| &p.label, |p, v| p.label = v))
///     }
/// }
///
/// assert_eq!(Point::schema().len(), 2);
/// ```
pub trait Bean: Default + 'static {
    /// Field descriptor table for this type
    fn schema() -> &'static BeanSchema<Self>;
}

/// Build a [`BeanSchema`] once and cache it in a static.
///
/// The first argument is the concrete bean type (not `Self`), the second a
/// closure-like expression receiving a fresh [`BeanSchemaBuilder`].
#[macro_export]
macro_rules! bean_schema {
    ($ty:ty, |$builder:ident| $body:expr) => {{
        static SCHEMA: ::std::sync::OnceLock<$crate::BeanSchema<$ty>> = ::std::sync::OnceLock::new();
        SCHEMA.get_or_init(|| {
            let $builder = $crate::BeanSchema::<$ty>::builder(stringify!($ty));
            ($body).build()
        })
    }};
}

/// Declared type of a bean field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar(ScalarKind),
    List { element: &'static str },
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(kind) => write!(f, "{}", kind),
            FieldType::List { element } => write!(f, "list<{}>", element),
        }
    }
}

pub(crate) trait ScalarSlot<B>: Send + Sync {
    fn kind(&self) -> ScalarKind;

    fn get(&self, bean: &B) -> Option<ScalarValue>;

    fn set(&self, bean: &mut B, value: Option<ScalarValue>) -> Result<(), String>;
}

struct ScalarAccessor<B, T> {
    get: fn(&B) -> &T,
    set: fn(&mut B, T),
}

impl<B, T: ScalarField> ScalarSlot<B> for ScalarAccessor<B, T> {
    fn kind(&self) -> ScalarKind {
        T::KIND
    }

    fn get(&self, bean: &B) -> Option<ScalarValue> {
        (self.get)(bean).read_scalar()
    }

    fn set(&self, bean: &mut B, value: Option<ScalarValue>) -> Result<(), String> {
        let value = T::write_scalar(value)?;
        (self.set)(bean, value);
        Ok(())
    }
}

/// Typed bridge between a list field and the record codec's recursion.
pub(crate) trait ListSlot<B>: Send + Sync {
    fn element(&self) -> &'static str;

    fn encode_elements(&self, bean: &B, codec: &RecordCodec) -> Result<Vec<String>, CodecError>;

    /// Decode one element per line and store them; returns how many were set.
    fn decode_elements(&self, bean: &mut B, lines: &[&str], codec: &RecordCodec) -> Result<usize, CodecError>;
}

struct ListAccessor<B, E> {
    get: fn(&B) -> &Vec<E>,
    set: fn(&mut B, Vec<E>),
}

impl<B, E: Bean> ListSlot<B> for ListAccessor<B, E> {
    fn element(&self) -> &'static str {
        E::schema().type_name()
    }

    fn encode_elements(&self, bean: &B, codec: &RecordCodec) -> Result<Vec<String>, CodecError> {
        (self.get)(bean).iter().map(|element| codec.encode(element)).collect()
    }

    fn decode_elements(&self, bean: &mut B, lines: &[&str], codec: &RecordCodec) -> Result<usize, CodecError> {
        let mut elements = Vec::with_capacity(lines.len());
        for line in lines {
            if let Some(element) = codec.decode::<E>(line)? {
                elements.push(element);
            }
        }

        // an empty list leaves the field at its default
        let count = elements.len();
        if count > 0 {
            (self.set)(bean, elements);
        }
        Ok(count)
    }
}

pub(crate) enum FieldAccess<B> {
    Scalar(Box<dyn ScalarSlot<B>>),
    List(Box<dyn ListSlot<B>>),
}

/// One field of a bean: its name, declared type and accessors.
pub struct FieldDescriptor<B> {
    name: &'static str,
    access: FieldAccess<B>,
}

impl<B> FieldDescriptor<B> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key used on the wire: the field name with its first letter capitalized.
    pub fn wire_name(&self) -> String {
        capitalize(self.name)
    }

    pub fn field_type(&self) -> FieldType {
        match &self.access {
            FieldAccess::Scalar(slot) => FieldType::Scalar(slot.kind()),
            FieldAccess::List(slot) => FieldType::List { element: slot.element() },
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self.access, FieldAccess::List(_))
    }

    pub(crate) fn access(&self) -> &FieldAccess<B> {
        &self.access
    }
}

impl<B> fmt::Debug for FieldDescriptor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type", &self.field_type())
            .finish()
    }
}

/// Field descriptor table of a bean type.
///
/// Fields keep the order in which they were declared on the builder; that
/// order is the encoding order. Decoding looks fields up by name.
pub struct BeanSchema<B> {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldDescriptor<B>>,
    methods: Vec<String>,
}

impl<B: 'static> BeanSchema<B> {
    pub fn builder(type_name: &'static str) -> BeanSchemaBuilder<B> {
        BeanSchemaBuilder {
            type_name,
            fields: IndexMap::new(),
            methods: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<B>> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<B>> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Every method name the type declares, accessors included
    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    /// Whether the type only declares getters and setters.
    pub fn is_bean_shape(&self) -> bool {
        crate::shape::non_accessor_methods(&self.methods).is_empty()
    }

    /// The sole field of a list-shaped type, if this is one.
    pub fn list_field(&self) -> Option<&FieldDescriptor<B>> {
        match self.fields.values().next() {
            Some(field) if self.fields.len() == 1 && field.is_list() => Some(field),
            _ => None,
        }
    }
}

impl<B: 'static> fmt::Debug for BeanSchema<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanSchema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.values().collect::<Vec<_>>())
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder for [`BeanSchema`].
///
/// Declaring a field also declares its `get_`/`set_` accessors. Re-declaring a
/// field name replaces the earlier accessors but keeps the original position.
pub struct BeanSchemaBuilder<B> {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldDescriptor<B>>,
    methods: Vec<String>,
}

impl<B: 'static> BeanSchemaBuilder<B> {
    /// Declare a scalar field (`T` or `Option<T>` of a supported scalar type).
    pub fn scalar<T: ScalarField + 'static>(
        self,
        name: &'static str,
        get: fn(&B) -> &T,
        set: fn(&mut B, T),
    ) -> Self {
        let access = FieldAccess::Scalar(Box::new(ScalarAccessor { get, set }));
        self.field(name, access)
    }

    /// Declare a list field whose elements are nested beans.
    pub fn list<E: Bean>(
        self,
        name: &'static str,
        get: fn(&B) -> &Vec<E>,
        set: fn(&mut B, Vec<E>),
    ) -> Self {
        let access = FieldAccess::List(Box::new(ListAccessor { get, set }));
        self.field(name, access)
    }

    /// Declare an additional method on the type.
    ///
    /// Anything not named like an accessor makes the type fail the bean
    /// shape check.
    pub fn method(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.methods.contains(&name) {
            self.methods.push(name);
        }
        self
    }

    pub fn build(self) -> BeanSchema<B> {
        BeanSchema {
            type_name: self.type_name,
            fields: self.fields,
            methods: self.methods,
        }
    }

    fn field(mut self, name: &'static str, access: FieldAccess<B>) -> Self {
        self.fields.insert(name, FieldDescriptor { name, access });
        self.method(format!("get_{}", name)).method(format!("set_{}", name))
    }
}

/// Upper-case the first character of a field name.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character of a wire key.
pub(crate) fn decapitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
