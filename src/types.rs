//! Vocabulary of the language and pure predicates over declared field types.

use crate::model::{Field, Service};
use std::fmt::Display;
use std::str::FromStr;

/// The six built-in field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Uuid,
    Date,
    Timestamp,
    String,
    Int,
    Bool,
}

impl Primitive {
    pub const ALL: [Primitive; 6] = [
        Primitive::Uuid,
        Primitive::Date,
        Primitive::Timestamp,
        Primitive::String,
        Primitive::Int,
        Primitive::Bool,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::Uuid => "UUID",
            Primitive::Date => "Date",
            Primitive::Timestamp => "Timestamp",
            Primitive::String => "String",
            Primitive::Int => "Int",
            Primitive::Bool => "Bool",
        }
    }

    /// A representative value used when a read field declares no example.
    pub fn example(self) -> &'static str {
        match self {
            Primitive::Uuid => "123e4567-e89b-12d3-a456-426614174000",
            Primitive::Date => "2024-01-15",
            Primitive::Timestamp => "2024-01-15T10:30:00Z",
            Primitive::String => "example",
            Primitive::Int => "42",
            Primitive::Bool => "true",
        }
    }
}

impl FromStr for Primitive {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Primitive::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or(())
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Read => "Read",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }
}

impl FromStr for Operation {
    type Err = ();

    /// Case-sensitive: `create` is not an operation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Nullable,
    Array,
}

impl Modifier {
    pub const ALL: [Modifier; 2] = [Modifier::Nullable, Modifier::Array];

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::Nullable => "Nullable",
            Modifier::Array => "Array",
        }
    }
}

impl FromStr for Modifier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or(())
    }
}

pub const REQUEST_ERROR_SUFFIX: &str = "RequestError";

pub fn is_primitive(type_name: &str) -> bool {
    type_name.parse::<Primitive>().is_ok()
}

/// Types that support ordering comparisons in range filters.
pub fn is_comparable(type_name: &str) -> bool {
    matches!(
        type_name.parse::<Primitive>(),
        Ok(Primitive::Int | Primitive::Date | Primitive::Timestamp)
    )
}

/// Types that support pattern matching in like filters.
pub fn is_string_like(type_name: &str) -> bool {
    matches!(type_name.parse::<Primitive>(), Ok(Primitive::String))
}

/// A field whose value can already be absent: nullable or a list.
pub fn is_nullable_or_array(field: &Field) -> bool {
    field.is_nullable() || field.is_array()
}

pub fn is_enum(service: &Service, type_name: &str) -> bool {
    service.has_enum(type_name)
}

/// A declared (or generated) object type. Primitives are never objects, even
/// if an object with a primitive's name was declared.
pub fn is_object(service: &Service, type_name: &str) -> bool {
    !is_primitive(type_name) && service.has_object(type_name)
}

/// Whether a type name resolves to a primitive, a declared enum or a declared object.
pub fn is_known_type(service: &Service, type_name: &str) -> bool {
    is_primitive(type_name) || service.has_enum(type_name) || service.has_object(type_name)
}
