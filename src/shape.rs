//! Bean shape check.
//!
//! A type qualifies as a bean when every method it declares is named like a
//! getter or a setter. Pairing, arity and return types are not inspected.

use crate::bean::Bean;

pub const GETTER_PREFIX: &str = "get";
pub const SETTER_PREFIX: &str = "set";

/// Whether `name` follows the getter or setter naming convention
pub fn is_accessor_name(name: &str) -> bool {
    name.starts_with(GETTER_PREFIX) || name.starts_with(SETTER_PREFIX)
}

/// Declared method names that are neither getters nor setters
pub fn non_accessor_methods(methods: &[String]) -> Vec<&str> {
    methods
        .iter()
        .map(String::as_str)
        .filter(|name| !is_accessor_name(name))
        .collect()
}

/// Whether `B` has the shape of a pure data holder.
pub fn is_bean_shape<B: Bean>() -> bool {
    B::schema().is_bean_shape()
}
